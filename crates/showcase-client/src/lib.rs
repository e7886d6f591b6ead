//! Showcase client library.
//!
//! Wraps a shared channel with typed clients for the Showcase and Operations
//! services, plus helpers for walking paginated results and polling
//! long-running operations.

use std::time::Duration;

use showcase_proto::{
    GetOperationRequest, Operation, OperationsClient, PaginationRequest,
    ShowcaseClient as ShowcaseStub,
};
use tonic::Status;
use tonic::transport::{Channel, Endpoint};

pub mod resource_name;

pub use resource_name::{first_path, parse_first_path, parse_single_path, single_path};
pub use showcase_proto as proto;

/// Convenience wrapper that provides typed clients for all services using a shared channel.
#[derive(Clone)]
pub struct ShowcaseClient {
    channel: Channel,
}

impl ShowcaseClient {
    /// Connect to a Showcase server at the given URI, e.g., "http://127.0.0.1:7469".
    pub async fn connect<D: TryInto<Endpoint>>(dst: D) -> Result<Self, Box<dyn std::error::Error>>
    where
        D::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let channel = Endpoint::new(dst)?.connect().await?;
        Ok(Self { channel })
    }

    pub fn showcase(&self) -> ShowcaseStub<Channel> {
        ShowcaseStub::new(self.channel.clone())
    }

    pub fn operations(&self) -> OperationsClient<Channel> {
        OperationsClient::new(self.channel.clone())
    }

    /// Fetches every page of `[0, max_response]` and returns the concatenation.
    pub async fn paginate_all(
        &self,
        max_response: i32,
        page_size: i32,
    ) -> Result<Vec<i32>, Status> {
        let mut client = self.showcase();
        let mut responses = Vec::new();
        let mut page_token = String::new();
        loop {
            let page = client
                .pagination(PaginationRequest {
                    max_response,
                    page_size,
                    page_token,
                    page_size_override: 0,
                })
                .await?
                .into_inner();
            responses.extend(page.responses);
            if page.next_page_token.is_empty() {
                return Ok(responses);
            }
            tracing::trace!(next = %page.next_page_token, "paginate_all: next page");
            page_token = page.next_page_token;
        }
    }

    /// Polls `operation` every `poll_interval` until it reports done.
    pub async fn wait_for_operation(
        &self,
        mut operation: Operation,
        poll_interval: Duration,
    ) -> Result<Operation, Status> {
        let mut client = self.operations();
        while !operation.done {
            tokio::time::sleep(poll_interval).await;
            operation = client
                .get_operation(GetOperationRequest {
                    name: operation.name,
                })
                .await?
                .into_inner();
        }
        Ok(operation)
    }
}
