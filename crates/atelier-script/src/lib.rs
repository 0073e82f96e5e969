//! Script writing through chat-completion models

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod provider;
mod server;

use std::sync::Arc;

use atelier_core::{Envelope, GenerationRequest, JsonPayload, Result};
use axum::{Router, extract::State, routing::post};

pub use server::{ScriptServerBuilder, Server};

/// Build the script server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &atelier_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        ScriptServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize script server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for script writing
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/generate-script", post(generate))
}

async fn generate(
    State(server): State<Arc<Server>>,
    JsonPayload(request): JsonPayload<GenerationRequest>,
) -> Result<Envelope> {
    let generated = server.generate(&request).await?;

    Ok(Envelope::success()
        .with("script", generated.artifact.as_text().unwrap_or_default())
        .with("provider", generated.provider)
        .demo(generated.demo))
}

#[cfg(test)]
mod tests {
    use atelier_config::{Config, ScriptProviderConfig, ScriptProviderType};
    use axum::body::Body;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    async fn post(config: &Config, body: &str) -> (u16, Value) {
        let app = endpoint_router().with_state(build_server(config).unwrap());

        let response = app
            .oneshot(
                axum::http::Request::post("/api/generate-script")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn config(provider: ScriptProviderConfig) -> Config {
        let mut config = Config::default();
        config.script.providers.insert("openai".to_string(), provider);
        config
    }

    #[tokio::test]
    async fn script_is_returned() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Scene 1: Sunrise."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut provider = ScriptProviderConfig::new(ScriptProviderType::Openai);
        provider.base_url = Some(server.uri());
        provider.api_key = Some("sk-test".into());

        let (status, body) = post(&config(provider), r#"{"prompt": "a morning run"}"#).await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({"status": "success", "script": "Scene 1: Sunrise.", "provider": "openai"}));
    }

    #[tokio::test]
    async fn demo_script_is_flagged() {
        let mut provider = ScriptProviderConfig::new(ScriptProviderType::Openai);
        provider.demo_fallback = true;

        let (status, body) = post(&config(provider), r#"{"prompt": "a morning run"}"#).await;

        assert_eq!(status, 200);
        assert_eq!(body["demo"], true);
        assert!(body["script"].as_str().unwrap().contains("a morning run"));
    }

    #[tokio::test]
    async fn missing_prompt_is_rejected() {
        let (status, body) = post(&Config::default(), "{}").await;

        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid request: prompt is required");
    }
}
