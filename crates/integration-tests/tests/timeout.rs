//! Overall request budget and abandoned jobs

mod harness;

use std::time::Duration;

use harness::config::ConfigBuilder;
use harness::mock_providers::{MOCK_SCRIPT, MockProviders};
use harness::server::TestServer;
use serde_json::json;

#[tokio::test]
async fn request_timeout_answers_with_envelope_and_stops_polling() {
    let mock = MockProviders::start().await.unwrap();
    mock.set_horde_pending_checks(u32::MAX);

    let config = ConfigBuilder::new()
        .with_horde("horde", &mock.horde_url())
        .with_polling("20ms", 10_000)
        .with_request_timeout("300ms")
        .build();
    let server = TestServer::start(config).await.unwrap();

    let response = server
        .client()
        .post(server.url("/api/generate-image"))
        .json(&json!({"prompt": "a sunset over mountains"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 408);
    assert_eq!(response.headers()["content-type"], "application/json");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "error",
            "error": "Request did not complete within 300ms",
            "error_type": "request_timeout"
        })
    );

    // The dropped handler must not keep polling the upstream job
    let checks = mock.horde_check_count();
    assert!(checks > 0);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(mock.horde_check_count() <= checks + 1);
}

#[tokio::test]
async fn composition_keeps_parts_finished_before_the_budget() {
    let mock = MockProviders::start().await.unwrap();
    mock.set_horde_pending_checks(u32::MAX);

    let config = ConfigBuilder::new()
        .with_openai_script("writer", &mock.openai_url(), Some("sk-test"), false)
        .with_horde("horde", &mock.horde_url())
        .with_polling("20ms", 10_000)
        .with_request_timeout("300ms")
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server
        .post_json("/api/generate-video", json!({"prompt": "a fox in the woods"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["script"], MOCK_SCRIPT);
    assert!(body.get("image_url").is_none());
    assert_eq!(body["error"], "image: Request did not complete within 270ms");
    assert_eq!(body["providers"], json!({"script": "writer"}));
    assert_eq!(mock.chat_count(), 1);
}
