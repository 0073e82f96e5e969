//! Direct text-to-video and composed generations

mod harness;

use harness::config::ConfigBuilder;
use harness::mock_providers::{MOCK_SCRIPT, MockProviders};
use harness::server::TestServer;
use serde_json::json;

#[tokio::test]
async fn direct_video_is_a_data_uri() {
    let mock = MockProviders::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_hf_video("zeroscope", &mock.hf_url(), Some("hf_test"))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server
        .post_json("/api/generate", json!({"prompt": "a cat surfing"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    // base64 of "mock-clip"
    assert_eq!(body["video_url"], "data:video/mp4;base64,bW9jay1jbGlw");
    assert_eq!(body["provider"], "zeroscope");
}

#[tokio::test]
async fn composition_runs_every_available_capability() {
    let mock = MockProviders::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_openai_script("writer", &mock.openai_url(), Some("sk-test"), false)
        .with_horde("horde", &mock.horde_url())
        .with_hf_video("zeroscope", &mock.hf_url(), Some("hf_test"))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server
        .post_json("/api/generate-video", json!({"prompt": "a fox in the woods"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["script"], MOCK_SCRIPT);
    assert_eq!(body["image_url"], "data:image/webp;base64,BASE64DATA");
    assert_eq!(body["video_url"], "data:video/mp4;base64,bW9jay1jbGlw");
    assert_eq!(
        body["providers"],
        json!({"script": "writer", "image": "horde", "video": "zeroscope"})
    );
    assert!(body.get("error").is_none());

    assert_eq!(mock.chat_count(), 1);
    assert_eq!(mock.horde_submit_count(), 1);
    assert_eq!(mock.video_count(), 1);
}

#[tokio::test]
async fn composition_reports_failed_parts() {
    let mock = MockProviders::start().await.unwrap();
    mock.fail_video();
    let config = ConfigBuilder::new()
        .with_openai_script("writer", &mock.openai_url(), Some("sk-test"), false)
        .with_hf_video("zeroscope", &mock.hf_url(), Some("hf_test"))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server
        .post_json("/api/generate-video", json!({"prompt": "a fox in the woods"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["script"], MOCK_SCRIPT);
    assert!(body.get("video_url").is_none());
    assert_eq!(body["error"], "video: Provider API error (503): model is loading");
    assert_eq!(body["providers"], json!({"script": "writer"}));
}
