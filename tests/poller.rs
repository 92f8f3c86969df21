use serde_json::json;
use std::time::Duration;
use storyboard_client::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config() -> PollConfig {
    PollConfig::with_interval(Duration::from_millis(10))
        .timeout(Some(Duration::from_secs(10)))
        .max_consecutive_failures(3)
}

#[tokio::test]
async fn polls_until_complete_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "progress": 50,
            "current_step": "Analysis complete!"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "progress": 100,
            "status": "completed",
            "current_step": "Generation complete! Created 0 frames."
        })))
        .mount(&server)
        .await;

    let client = StoryboardClient::new(server.uri()).expect("client");
    let poller = ProgressPoller::new(client, "/status/p1", fast_config());

    let mut seen = Vec::new();
    let outcome = poller
        .run(|status| seen.push((status.progress, status.current_step.clone())))
        .await
        .expect("poll ok");

    assert!(matches!(outcome, PollOutcome::Completed(_)));
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, 50);
    assert_eq!(seen[1].0, 100);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn recovers_from_a_transient_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "busy"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"progress": 100})))
        .mount(&server)
        .await;

    let client = StoryboardClient::new(server.uri()).expect("client");
    let mut updates = 0;
    let outcome = ProgressPoller::new(client, "/status/p1", fast_config())
        .run(|_| updates += 1)
        .await
        .expect("poll ok");

    assert!(matches!(outcome, PollOutcome::Completed(_)));
    assert_eq!(updates, 1);
}

#[tokio::test]
async fn unknown_project_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Status not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = StoryboardClient::new(server.uri()).expect("client");
    let err = ProgressPoller::new(client, "/status/missing", fast_config())
        .run(|_| {})
        .await
        .expect_err("404 ends polling");
    assert_eq!(err.message, "Status not found");
}

#[tokio::test]
async fn server_side_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "progress": 40,
            "error": "Image model unavailable",
            "current_step": "Error: Image model unavailable"
        })))
        .mount(&server)
        .await;

    let client = StoryboardClient::new(server.uri()).expect("client");
    let outcome = ProgressPoller::new(client, "/status/p1", fast_config())
        .run(|_| {})
        .await
        .expect("poll ok");

    match outcome {
        PollOutcome::Failed(status) => {
            assert_eq!(status.error.as_deref(), Some("Image model unavailable"))
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}
