use crate::test_utilities::{TestServer, rpc_status};
use showcase_grpc::proto;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Code;

fn echo_request(content: &str) -> proto::EchoRequest {
    proto::EchoRequest {
        content: content.to_string(),
        error: None,
    }
}

#[tokio::test]
async fn test_expand_yields_each_word_then_closes() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let mut stream = client
        .expand(proto::ExpandRequest {
            content: "a b c".into(),
            error: Some(rpc_status(Code::Ok, "")),
        })
        .await
        .unwrap()
        .into_inner();

    let mut words = Vec::new();
    while let Some(item) = stream.message().await.expect("clean stream") {
        words.push(item.content);
    }
    assert_eq!(words, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_expand_terminates_with_configured_error() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let mut stream = client
        .expand(proto::ExpandRequest {
            content: "one two".into(),
            error: Some(rpc_status(Code::DataLoss, "lost the rest")),
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(stream.message().await.unwrap().unwrap().content, "one");
    assert_eq!(stream.message().await.unwrap().unwrap().content, "two");
    let status = stream.message().await.unwrap_err();
    assert_eq!(status.code(), Code::DataLoss);
    assert_eq!(status.message(), "lost the rest");
}

#[tokio::test]
async fn test_collect_joins_contents_in_order() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let requests = tokio_stream::iter(vec![
        echo_request("the"),
        echo_request("quick"),
        echo_request("fox"),
    ]);
    let resp = client.collect(requests).await.unwrap().into_inner();
    assert_eq!(resp.content, "the quick fox");
}

#[tokio::test]
async fn test_collect_fails_on_first_error() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let requests = tokio_stream::iter(vec![
        echo_request("fine"),
        proto::EchoRequest {
            content: "bad".into(),
            error: Some(rpc_status(Code::FailedPrecondition, "stop here")),
        },
        echo_request("never seen"),
    ]);
    let status = client.collect(requests).await.unwrap_err();
    assert_eq!(status.code(), Code::FailedPrecondition);
    assert_eq!(status.message(), "stop here");
}

#[tokio::test]
async fn test_chat_echoes_each_message_in_order() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let (tx, rx) = tokio::sync::mpsc::channel(4);
    let mut replies = client
        .chat(ReceiverStream::new(rx))
        .await
        .unwrap()
        .into_inner();

    for word in ["ping", "pong", "done"] {
        tx.send(echo_request(word)).await.unwrap();
        let reply = tokio::time::timeout(Duration::from_secs(5), replies.message())
            .await
            .expect("timely reply")
            .expect("stream ok")
            .expect("reply present");
        assert_eq!(reply.content, word);
    }

    drop(tx);
    let end = tokio::time::timeout(Duration::from_secs(5), replies.message())
        .await
        .expect("timely close")
        .expect("clean close");
    assert!(end.is_none());
}

#[tokio::test]
async fn test_chat_error_terminates_stream() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let (tx, rx) = tokio::sync::mpsc::channel(4);
    let mut replies = client
        .chat(ReceiverStream::new(rx))
        .await
        .unwrap()
        .into_inner();

    tx.send(echo_request("hello")).await.unwrap();
    assert_eq!(replies.message().await.unwrap().unwrap().content, "hello");

    tx.send(proto::EchoRequest {
        content: "ignored".into(),
        error: Some(rpc_status(Code::Unauthenticated, "who are you")),
    })
    .await
    .unwrap();
    let status = replies.message().await.unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn test_dropping_chat_client_does_not_disturb_server() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    {
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let mut replies = client
            .chat(ReceiverStream::new(rx))
            .await
            .unwrap()
            .into_inner();
        tx.send(echo_request("bye")).await.unwrap();
        assert_eq!(replies.message().await.unwrap().unwrap().content, "bye");
        // Both directions are dropped here while the server still waits for input.
    }

    let resp = client.echo(echo_request("still alive")).await.unwrap();
    assert_eq!(resp.into_inner().content, "still alive");
}
