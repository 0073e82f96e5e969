//! Script generation

mod harness;

use harness::config::ConfigBuilder;
use harness::mock_providers::{MOCK_SCRIPT, MockProviders};
use harness::server::TestServer;
use serde_json::json;

#[tokio::test]
async fn keyed_provider_returns_completion() {
    let mock = MockProviders::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_openai_script("writer", &mock.openai_url(), Some("sk-test"), false)
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server
        .post_json("/api/generate-script", json!({"prompt": "a fox in the woods"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "success", "script": MOCK_SCRIPT, "provider": "writer"}));
    assert_eq!(mock.chat_count(), 1);
}

#[tokio::test]
async fn demo_script_mentions_the_prompt() {
    let mock = MockProviders::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_openai_script("writer", &mock.openai_url(), None, true)
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server
        .post_json("/api/generate-script", json!({"prompt": "a fox in the woods"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["demo"], true);
    assert!(body["script"].as_str().unwrap().contains("a fox in the woods"));
    assert_eq!(mock.chat_count(), 0);
}

#[tokio::test]
async fn no_script_provider_is_a_configuration_error() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let (status, body) = server
        .post_json("/api/generate-script", json!({"prompt": "a fox in the woods"}))
        .await;

    assert_eq!(status, 500);
    assert_eq!(body["error_type"], "configuration_error");
}
