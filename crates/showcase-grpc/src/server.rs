use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use showcase::echo::{Collector, check, echo, expand_words};
use showcase::{OperationSpec, PageRequest};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};
use tower_http::trace::TraceLayer;

use crate::convert::{
    proto_duration_to_std, showcase_error_to_status, snapshot_to_operation, status_from_proto,
    timestamp_to_datetime,
};
use crate::proto::google::longrunning::operations_server::Operations;
use crate::proto::google::showcase::v1::showcase_server::Showcase;
use crate::proto::*;

/// Dispatches Showcase and Operations RPCs onto a shared core instance.
#[derive(Clone)]
pub struct ShowcaseGrpcService {
    pub core: Arc<showcase::Showcase>,
}

impl ShowcaseGrpcService {
    pub fn new(core: Arc<showcase::Showcase>) -> Self {
        Self { core }
    }
}

fn configured_error(status: Option<RpcStatus>) -> Option<showcase::StatusSpec> {
    status.map(status_from_proto)
}

type StreamSender = mpsc::Sender<Result<EchoResponse, Status>>;

/// Emits one response per word, then the configured error if any. Returns early
/// once the receiving side is gone.
fn spawn_expand(
    words: Vec<String>,
    error: Option<showcase::StatusSpec>,
    tx: StreamSender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        for content in words {
            if tx.send(Ok(EchoResponse { content })).await.is_err() {
                tracing::debug!("expand: client disconnected");
                return;
            }
        }
        if let Err(e) = check(error.as_ref()) {
            let _ = tx.send(Err(showcase_error_to_status(e))).await;
        }
    })
}

/// Echoes each inbound item until either side closes or an item fails.
fn spawn_chat<S>(mut inbound: S, tx: StreamSender) -> JoinHandle<()>
where
    S: Stream<Item = Result<EchoRequest, Status>> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                _ = tx.closed() => {
                    tracing::debug!("chat: client disconnected");
                    return;
                }
                next = inbound.next() => next,
            };
            let reply = match next {
                Some(Ok(req)) => {
                    let error = configured_error(req.error);
                    echo(req.content, error.as_ref())
                        .map(|content| EchoResponse { content })
                        .map_err(showcase_error_to_status)
                }
                None => return,
                Some(Err(status)) => Err(status),
            };
            let failed = reply.is_err();
            if tx.send(reply).await.is_err() || failed {
                return;
            }
        }
    })
}

#[tonic::async_trait]
impl Showcase for ShowcaseGrpcService {
    async fn echo(&self, request: Request<EchoRequest>) -> Result<Response<EchoResponse>, Status> {
        let req = request.into_inner();
        let error = configured_error(req.error);
        let content = echo(req.content, error.as_ref()).map_err(showcase_error_to_status)?;
        Ok(Response::new(EchoResponse { content }))
    }

    type ExpandStream = ReceiverStream<Result<EchoResponse, Status>>;

    async fn expand(
        &self,
        request: Request<ExpandRequest>,
    ) -> Result<Response<Self::ExpandStream>, Status> {
        let req = request.into_inner();
        let words: Vec<String> = expand_words(&req.content).map(str::to_owned).collect();
        let error = configured_error(req.error);

        let (tx, rx) = mpsc::channel(self.core.config().stream_buffer);
        spawn_expand(words, error, tx);

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn collect(
        &self,
        request: Request<Streaming<EchoRequest>>,
    ) -> Result<Response<EchoResponse>, Status> {
        let mut stream = request.into_inner();
        let mut collector = Collector::new();
        while let Some(req) = stream.message().await? {
            let error = configured_error(req.error);
            collector
                .push(req.content, error.as_ref())
                .map_err(showcase_error_to_status)?;
        }
        tracing::debug!(items = collector.len(), "collect: inbound stream closed");
        Ok(Response::new(EchoResponse {
            content: collector.finish(),
        }))
    }

    type ChatStream = ReceiverStream<Result<EchoResponse, Status>>;

    async fn chat(
        &self,
        request: Request<Streaming<EchoRequest>>,
    ) -> Result<Response<Self::ChatStream>, Status> {
        let inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(self.core.config().stream_buffer);
        spawn_chat(inbound, tx);

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn timeout(
        &self,
        request: Request<TimeoutRequest>,
    ) -> Result<Response<TimeoutResponse>, Status> {
        let req = request.into_inner();
        let delay = req
            .response_delay
            .map(|d| proto_duration_to_std("response_delay", d))
            .transpose()?
            .unwrap_or_default();

        tokio::time::sleep(delay).await;

        let error = configured_error(req.error);
        check(error.as_ref()).map_err(showcase_error_to_status)?;
        Ok(Response::new(req.success.unwrap_or_default()))
    }

    async fn setup_retry(
        &self,
        request: Request<SetupRetryRequest>,
    ) -> Result<Response<RetryId>, Status> {
        let req = request.into_inner();
        let responses = req.responses.into_iter().map(status_from_proto).collect();
        let id = self.core.setup_retry(responses);
        Ok(Response::new(RetryId { id }))
    }

    async fn retry(&self, request: Request<RetryId>) -> Result<Response<()>, Status> {
        let req = request.into_inner();
        self.core.retry(&req.id).map_err(showcase_error_to_status)?;
        Ok(Response::new(()))
    }

    async fn longrunning(
        &self,
        request: Request<LongrunningRequest>,
    ) -> Result<Response<Operation>, Status> {
        let req = request.into_inner();
        let completion_time = req
            .completion_time
            .as_ref()
            .map(timestamp_to_datetime)
            .transpose()?;
        let snapshot = self.core.start_operation(OperationSpec {
            completion_time,
            error: configured_error(req.error),
            success: req.success.map(|s| s.content),
        });
        tracing::debug!(name = %snapshot.name, done = snapshot.is_done(), "longrunning: started");
        Ok(Response::new(snapshot_to_operation(snapshot)))
    }

    async fn pagination(
        &self,
        request: Request<PaginationRequest>,
    ) -> Result<Response<PaginationResponse>, Status> {
        let req = request.into_inner();
        let page = self
            .core
            .paginate(&PageRequest {
                max_response: req.max_response,
                page_size: req.page_size,
                page_token: req.page_token,
                page_size_override: req.page_size_override,
            })
            .map_err(showcase_error_to_status)?;
        Ok(Response::new(PaginationResponse {
            responses: page.responses,
            next_page_token: page.next_page_token,
        }))
    }

    async fn parameter_flattening(
        &self,
        request: Request<ParameterFlatteningMessage>,
    ) -> Result<Response<ParameterFlatteningMessage>, Status> {
        Ok(Response::new(request.into_inner()))
    }

    async fn resource_name(
        &self,
        request: Request<ResourceNameMessage>,
    ) -> Result<Response<ResourceNameMessage>, Status> {
        Ok(Response::new(request.into_inner()))
    }
}

#[tonic::async_trait]
impl Operations for ShowcaseGrpcService {
    async fn list_operations(
        &self,
        request: Request<ListOperationsRequest>,
    ) -> Result<Response<ListOperationsResponse>, Status> {
        let req = request.into_inner();
        let (snapshots, next_page_token) = self
            .core
            .list_operations(req.page_size, &req.page_token)
            .map_err(showcase_error_to_status)?;
        Ok(Response::new(ListOperationsResponse {
            operations: snapshots.into_iter().map(snapshot_to_operation).collect(),
            next_page_token,
        }))
    }

    async fn get_operation(
        &self,
        request: Request<GetOperationRequest>,
    ) -> Result<Response<Operation>, Status> {
        let req = request.into_inner();
        let snapshot = self
            .core
            .get_operation(&req.name)
            .map_err(showcase_error_to_status)?;
        Ok(Response::new(snapshot_to_operation(snapshot)))
    }

    async fn delete_operation(
        &self,
        request: Request<DeleteOperationRequest>,
    ) -> Result<Response<()>, Status> {
        let req = request.into_inner();
        self.core
            .delete_operation(&req.name)
            .map_err(showcase_error_to_status)?;
        Ok(Response::new(()))
    }

    async fn cancel_operation(
        &self,
        request: Request<CancelOperationRequest>,
    ) -> Result<Response<()>, Status> {
        let req = request.into_inner();
        self.core
            .cancel_operation(&req.name)
            .map_err(showcase_error_to_status)?;
        Ok(Response::new(()))
    }

    async fn wait_operation(
        &self,
        request: Request<WaitOperationRequest>,
    ) -> Result<Response<Operation>, Status> {
        let req = request.into_inner();
        let deadline = req
            .timeout
            .map(|d| proto_duration_to_std("timeout", d))
            .transpose()?
            .map(|t| tokio::time::Instant::now() + t);

        loop {
            let snapshot = self
                .core
                .get_operation(&req.name)
                .map_err(showcase_error_to_status)?;
            let Some(remaining) = snapshot.time_remaining() else {
                return Ok(Response::new(snapshot_to_operation(snapshot)));
            };
            let wake = tokio::time::Instant::now() + remaining.to_std().unwrap_or_default();
            let wake = match deadline {
                Some(deadline) if deadline <= tokio::time::Instant::now() => {
                    return Ok(Response::new(snapshot_to_operation(snapshot)));
                }
                Some(deadline) => wake.min(deadline),
                None => wake,
            };
            tokio::time::sleep_until(wake).await;
        }
    }
}

/// Run a gRPC server with the Showcase services on the given address.
pub async fn serve(
    addr: SocketAddr,
    core: Arc<showcase::Showcase>,
) -> Result<(), Box<dyn std::error::Error>> {
    serve_with_shutdown(addr, core, std::future::pending()).await
}

/// Like [`serve`], but stops accepting requests once `signal` resolves.
pub async fn serve_with_shutdown<F>(
    addr: SocketAddr,
    core: Arc<showcase::Showcase>,
    signal: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let svc = ShowcaseGrpcService::new(core);
    tracing::info!(%addr, "serving Showcase and Operations");
    tonic::transport::Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .add_service(ShowcaseServer::new(svc.clone()))
        .add_service(OperationsServer::new(svc))
        .serve_with_shutdown(addr, signal)
        .await?;
    Ok(())
}
