use std::time::Duration;

use autozip_core::JobState;
use autozip_engine::{ApiSettings, FailureKind, PackApi, ReqwestPackApi};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestPackApi {
    ReqwestPackApi::new(&server.uri(), &ApiSettings::default()).expect("valid base url")
}

#[tokio::test]
async fn pack_sends_output_path_and_reads_acceptance() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pack"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "output_path": "D:\\out" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true, "message": "started" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = api_for(&server).pack("D:\\out").await.expect("pack ok");
    assert!(reply.success);
    assert_eq!(reply.message.as_deref(), Some("started"));
}

#[tokio::test]
async fn pack_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pack"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": false, "message": "disk full" })),
        )
        .mount(&server)
        .await;

    let reply = api_for(&server).pack("D:\\out").await.expect("reply");
    assert!(!reply.success);
    assert_eq!(reply.message.as_deref(), Some("disk full"));
}

#[tokio::test]
async fn pack_reads_rejection_body_even_with_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pack"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "success": false, "message": "bad path" })),
        )
        .mount(&server)
        .await;

    let reply = api_for(&server).pack("??").await.expect("reply");
    assert_eq!(reply.message.as_deref(), Some("bad path"));
}

#[tokio::test]
async fn pack_without_json_body_maps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pack"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = api_for(&server).pack("D:\\out").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn status_is_decoded_into_job_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "packing",
            "progress": 42,
            "message": "compressing a.txt"
        })))
        .mount(&server)
        .await;

    let status = api_for(&server)
        .status()
        .await
        .expect("status")
        .into_status();
    assert_eq!(status.state, JobState::Packing);
    assert_eq!(status.progress, 42);
    assert_eq!(status.message, "compressing a.txt");
}

#[tokio::test]
async fn status_with_garbage_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).status().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn status_http_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).status().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn status_times_out_on_slow_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "status": "packing" })),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    };
    let api = ReqwestPackApi::new(&server.uri(), &settings).unwrap();
    let err = api.status().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn shutdown_posts_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/shutdown"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).shutdown().await.expect("shutdown ok");
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/autozip/api/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ready" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = ReqwestPackApi::new(
        &format!("{}/autozip", server.uri()),
        &ApiSettings::default(),
    )
    .unwrap();
    assert_eq!(api.status().await.unwrap().into_status().state, JobState::Idle);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestPackApi::new("not a url", &ApiSettings::default()).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Port 9 on localhost is almost never listening.
    let api = ReqwestPackApi::new("http://127.0.0.1:9", &ApiSettings::default()).unwrap();
    let err = api.status().await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::Network | FailureKind::Timeout
    ));
}
