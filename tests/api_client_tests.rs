mod common;

use common::StubServer;
use lectern::api::ApiClient;
use lectern::config::Settings;
use lectern::LecternError;
use serde_json::json;

fn client_for(stub: &StubServer) -> ApiClient {
    let mut settings = Settings::default();
    settings.server.base_url = stub.url();
    ApiClient::from_settings(&settings).expect("build api client")
}

#[tokio::test]
async fn configured_token_rides_as_a_bearer_header() {
    let stub = StubServer::start().await;
    stub.stub("GET", "/api/documents", 200, json!([]));

    let mut settings = Settings::default();
    settings.server.base_url = stub.url();
    settings.server.api_token = "sekrit-token".to_string();
    let client = ApiClient::from_settings(&settings).expect("build api client");

    client.list_documents().await.expect("list documents");

    let requests = stub.requests_for("/api/documents");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer sekrit-token")
    );
}

#[tokio::test]
async fn unauthorized_maps_to_an_auth_error() {
    let stub = StubServer::start().await;
    stub.stub(
        "GET",
        "/api/documents",
        401,
        json!({ "detail": "Not authenticated" }),
    );

    let client = client_for(&stub);
    let err = client.list_documents().await.expect_err("should fail");

    match err {
        LecternError::Auth(detail) => assert_eq!(detail, "Not authenticated"),
        other => panic!("expected Auth error, got: {other:?}"),
    }
}

#[tokio::test]
async fn missing_resources_map_to_not_found() {
    let stub = StubServer::start().await;
    stub.stub(
        "GET",
        "/api/videos/99",
        404,
        json!({ "detail": "Video not found" }),
    );

    let client = client_for(&stub);
    let err = client.get_video(99).await.expect_err("should fail");

    match err {
        LecternError::NotFound(detail) => assert_eq!(detail, "Video not found"),
        other => panic!("expected NotFound error, got: {other:?}"),
    }
}

#[tokio::test]
async fn other_failures_carry_status_and_platform_detail() {
    let stub = StubServer::start().await;
    stub.stub(
        "GET",
        "/api/videos/1",
        500,
        json!({ "detail": "database is down" }),
    );

    let client = client_for(&stub);
    let err = client.get_video(1).await.expect_err("should fail");

    match err {
        LecternError::Api { status, detail } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(detail, "database is down");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_bodies_fall_back_to_the_status_reason() {
    let stub = StubServer::start().await;
    stub.stub_text("GET", "/api/videos/1", 502, "");

    let client = client_for(&stub);
    let err = client.get_video(1).await.expect_err("should fail");

    match err {
        LecternError::Api { status, detail } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(detail, "Bad Gateway");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn record_watch_posts_an_absolute_snapshot() {
    let stub = StubServer::start().await;
    stub.stub(
        "POST",
        "/api/videos/7/watch",
        200,
        json!({ "message": "recorded" }),
    );

    let client = client_for(&stub);
    client
        .record_watch(7, 63.0, 52.5)
        .await
        .expect("record watch");

    let requests = stub.requests_for("/api/videos/7/watch");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");

    let body: serde_json::Value =
        serde_json::from_str(&requests[0].body).expect("watch body should be JSON");
    assert_eq!(body["video_id"], json!(7));
    assert_eq!(body["watch_duration"], json!(63.0));
    assert_eq!(body["completion_percentage"], json!(52.5));
}

#[tokio::test]
async fn chat_history_parses_timezone_less_timestamps() {
    let stub = StubServer::start().await;
    stub.stub(
        "GET",
        "/api/study/history",
        200,
        json!([{
            "id": 1,
            "message": "q",
            "response": "a",
            "context_type": null,
            "context_id": null,
            "created_at": "2024-05-01T10:00:30"
        }]),
    );

    let client = client_for(&stub);
    let history = client.chat_history().await.expect("load history");

    assert_eq!(history.len(), 1);
    let expected = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 30)
        .unwrap();
    assert_eq!(history[0].created_at, expected);
}
