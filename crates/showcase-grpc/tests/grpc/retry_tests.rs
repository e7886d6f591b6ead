use crate::test_utilities::{TestServer, rpc_status};
use showcase_grpc::proto;
use tonic::Code;

#[tokio::test]
async fn test_retry_replays_configured_sequence() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let id = client
        .setup_retry(proto::SetupRetryRequest {
            responses: vec![
                rpc_status(Code::Unavailable, "A"),
                rpc_status(Code::Aborted, "B"),
                rpc_status(Code::Ok, ""),
            ],
        })
        .await
        .unwrap()
        .into_inner();
    assert!(!id.id.is_empty());

    let first = client.retry(id.clone()).await.unwrap_err();
    assert_eq!(first.code(), Code::Unavailable);
    assert_eq!(first.message(), "A");

    let second = client.retry(id.clone()).await.unwrap_err();
    assert_eq!(second.code(), Code::Aborted);
    assert_eq!(second.message(), "B");

    client.retry(id.clone()).await.expect("third attempt succeeds");

    let fourth = client.retry(id).await.unwrap_err();
    assert_eq!(fourth.code(), Code::OutOfRange);
}

#[tokio::test]
async fn test_retry_unknown_id_is_not_found() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let status = client
        .retry(proto::RetryId {
            id: "no-such-id".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_concurrent_retries_consume_each_status_once() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let responses = (0..20)
        .map(|i| rpc_status(Code::Aborted, &format!("attempt-{i}")))
        .collect();
    let id = client
        .setup_retry(proto::SetupRetryRequest { responses })
        .await
        .unwrap()
        .into_inner();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let mut client = client.clone();
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            client.retry(id).await.unwrap_err().message().to_string()
        }));
    }
    let mut messages = Vec::new();
    for task in tasks {
        messages.push(task.await.unwrap());
    }
    messages.sort();
    messages.dedup();
    assert_eq!(messages.len(), 20);

    let status = client.retry(id).await.unwrap_err();
    assert_eq!(status.code(), Code::OutOfRange);
}

#[tokio::test]
async fn test_retry_with_empty_id_is_not_found() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let status = client
        .retry(proto::RetryId { id: String::new() })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}
