use reqwest::Method;
use serde_json::json;
use storyboard_client::api::models::Style;
use storyboard_client::prelude::*;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StoryboardClient {
    StoryboardClient::new(server.uri()).expect("client creation failed")
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get("/status/p1")
        .await
        .expect_err("500 must fail");
    assert_eq!(err.message, "boom");
    assert_eq!(err.to_string(), "boom");
    assert_eq!(err.status, Some(500));
}

#[tokio::test]
async fn success_returns_json_unchanged() {
    let payload = json!({
        "progress": 42,
        "current_step": "Generating frame 3 of 8",
        "nested": {"list": [1, 2, 3], "flag": true, "none": null}
    });

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let value = client_for(&server).get("/status/p1").await.expect("request ok");
    assert_eq!(value, payload);
}

#[tokio::test]
async fn error_without_message_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get("/health").await.expect_err("502 must fail");
    assert_eq!(err.message, "HTTP 502");
    assert_eq!(err.code, None);
}

#[tokio::test]
async fn error_code_is_carried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": "Too many jobs", "code": "RATE_LIMITED"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .post("/generate", &json!({"project_id": "p1", "style": "classic"}))
        .await
        .expect_err("429 must fail");
    assert_eq!(err.message, "Too many jobs");
    assert_eq!(err.code.as_deref(), Some("RATE_LIMITED"));
}

#[tokio::test]
async fn malformed_success_body_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"progress\": "))
        .mount(&server)
        .await;

    let err = client_for(&server).get("/status/p1").await.expect_err("bad json must fail");
    assert_eq!(err.status, Some(200));
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client_for(&server)
        .post("/ping", &json!({}))
        .await
        .expect("204 is fine");
    assert!(value.is_null());
}

#[tokio::test]
async fn unreachable_server_is_a_failure() {
    // nothing listens on port 9 of the loopback interface
    let client = StoryboardClient::new("http://127.0.0.1:9".to_string()).expect("client");
    let err = client.get("/health").await.expect_err("no server");
    assert_eq!(err.status, None);
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn post_sends_json_with_default_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"project_id": "p1", "style": "cinematic"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "project_id": "p1",
            "message": "Generation started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .start_generation("p1", Style::Cinematic)
        .await
        .expect("generation started");
    assert_eq!(response.project_id, "p1");
}

#[tokio::test]
async fn request_options_override_headers_and_method() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/notes"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions {
        method: Method::PUT,
        body: Some("scene notes".to_string()),
        headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
    };
    let value = client_for(&server)
        .request("/notes", options)
        .await
        .expect("put ok");
    assert_eq!(value, json!({"ok": true}));
}

#[tokio::test]
async fn typed_status_decoding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "generating",
            "progress": 67.5,
            "current_step": "Generating frame 5 of 8"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).status("p1").await.expect("status ok");
    assert_eq!(status.progress, 67);
    assert_eq!(status.state(), JobState::Running);
}

#[tokio::test]
async fn health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-05-01T10:00:00",
            "version": "1.0.0"
        })))
        .mount(&server)
        .await;

    let health = client_for(&server).health().await.expect("health ok");
    assert!(health.is_healthy());
    assert_eq!(health.version.as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn upload_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "project_id": "p-new",
            "filename": "draft.txt",
            "word_count": 2,
            "char_count": 9,
            "text_length": 9,
            "detected_scenes": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = client_for(&server)
        .upload("draft.txt", b"FADE IN:\n".to_vec())
        .await
        .expect("upload ok");
    assert_eq!(upload.project_id, "p-new");

    let requests = server.received_requests().await.expect("recording enabled");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"draft.txt\""));
}
