use crate::test_utilities::{TestServer, rpc_status};
use showcase_grpc::proto;
use tonic::Code;

#[tokio::test]
async fn test_echo_returns_content() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let resp = client
        .echo(proto::EchoRequest {
            content: "hi".into(),
            error: Some(rpc_status(Code::Ok, "")),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resp.content, "hi");
}

#[tokio::test]
async fn test_echo_configured_error_wins_over_content() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let status = client
        .echo(proto::EchoRequest {
            content: "hi".into(),
            error: Some(rpc_status(Code::InvalidArgument, "rejected on purpose")),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "rejected on purpose");
}

#[tokio::test]
async fn test_timeout_honours_client_deadline() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let mut request = tonic::Request::new(proto::TimeoutRequest {
        response_delay: Some(proto::prost_types::Duration {
            seconds: 2,
            nanos: 0,
        }),
        error: None,
        success: Some(proto::TimeoutResponse {
            content: "too late".into(),
        }),
    });
    request.set_timeout(std::time::Duration::from_millis(200));
    let status = client.timeout(request).await.unwrap_err();
    assert!(matches!(
        status.code(),
        Code::DeadlineExceeded | Code::Cancelled
    ));

    let resp = client
        .timeout(proto::TimeoutRequest {
            response_delay: Some(proto::prost_types::Duration {
                seconds: 0,
                nanos: 100_000_000,
            }),
            error: None,
            success: Some(proto::TimeoutResponse {
                content: "on time".into(),
            }),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resp.content, "on time");
}

#[tokio::test]
async fn test_passthrough_rpcs() {
    let srv = TestServer::start().await.expect("start server");
    let mut client = srv.showcase().await;

    let message = proto::ParameterFlatteningMessage {
        content: "c".into(),
        repeated_content: vec!["r1".into(), "r2".into()],
        nested: None,
    };
    let resp = client
        .parameter_flattening(message.clone())
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resp, message);

    let names = proto::ResourceNameMessage {
        single_template: "id/42/single".into(),
        multiple_templates: "id/42/first".into(),
    };
    let resp = client.resource_name(names.clone()).await.unwrap().into_inner();
    assert_eq!(resp, names);
}
