//! OpenAI-compatible chat completions used as a scriptwriter

use std::time::Duration;

use async_trait::async_trait;
use atelier_config::ScriptProviderConfig;
use atelier_core::{
    Artifact, Capability, Credential, GenerationError, GenerationRequest, Provider, Result, Submission,
    ensure_success, http_client, network_error,
};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::demo;

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.8;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are a scriptwriter for short videos. Write a concise script of three to \
     five numbered scenes for the idea you are given. For each scene give a one-line visual description \
     followed by the narration. Keep the whole script under 300 words.";

/// OpenAI-compatible scriptwriter
pub(crate) struct OpenAiScriptProvider {
    name: String,
    client: Client,
    credential: Credential,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system_prompt: String,
}

impl OpenAiScriptProvider {
    pub fn new(name: String, config: &ScriptProviderConfig) -> Self {
        Self {
            name,
            client: http_client(),
            credential: Credential::resolve(config.api_key.as_ref(), config.demo_fallback),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| SYSTEM_PROMPT.to_string()),
        }
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl Provider for OpenAiScriptProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        Capability::Script
    }

    fn is_available(&self) -> bool {
        self.credential.is_usable()
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission> {
        let Some(api_key) = self.credential.key(&self.name)? else {
            return Ok(Submission::Demo(Artifact::text(demo::script(&request.prompt))));
        };

        let model = request.model.as_deref().unwrap_or(&self.model);

        let wire_request = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(provider = %self.name, model = %model, "requesting script");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| network_error(&self.name, &e))?;

        let wire_response: ChatResponse = ensure_success(&self.name, response)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(format!("failed to parse response: {e}")))?;

        let script = wire_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse("completion contained no script".to_string()))?;

        Ok(Submission::Ready(Artifact::text(script)))
    }
}

#[cfg(test)]
mod tests {
    use atelier_config::ScriptProviderType;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use super::*;

    fn provider(server: &MockServer, api_key: Option<&str>, demo_fallback: bool) -> OpenAiScriptProvider {
        let mut config = ScriptProviderConfig::new(ScriptProviderType::Openai);
        config.base_url = Some(format!("{}/v1/", server.uri()));
        config.api_key = api_key.map(SecretString::from);
        config.demo_fallback = demo_fallback;
        OpenAiScriptProvider::new("openai".to_string(), &config)
    }

    #[tokio::test]
    async fn sends_scriptwriter_prompt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 500,
                "messages": [{"role": "system"}, {"role": "user", "content": "a day at the beach"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "  Scene 1: Waves.\n"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let submission = provider(&server, Some("sk-test"), false)
            .submit(&GenerationRequest::new("a day at the beach"))
            .await
            .unwrap();

        let Submission::Ready(artifact) = submission else {
            panic!("expected a script");
        };
        assert_eq!(artifact.as_text(), Some("Scene 1: Waves."));
    }

    #[tokio::test]
    async fn empty_choices_are_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let result = provider(&server, Some("sk-test"), false)
            .submit(&GenerationRequest::new("a day at the beach"))
            .await;
        assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn rate_limit_is_a_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let result = provider(&server, Some("sk-test"), true)
            .submit(&GenerationRequest::new("a day at the beach"))
            .await;
        assert!(matches!(result, Err(GenerationError::ProviderHttp { status: 429, .. })));
    }

    #[tokio::test]
    async fn demo_script_without_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let submission = provider(&server, None, true)
            .submit(&GenerationRequest::new("a day at the beach"))
            .await
            .unwrap();

        let Submission::Demo(artifact) = submission else {
            panic!("expected demo content");
        };
        assert!(artifact.as_text().unwrap().contains("a day at the beach"));
    }

    #[tokio::test]
    async fn missing_key_without_fallback_fails() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = provider(&server, None, false)
            .submit(&GenerationRequest::new("a day at the beach"))
            .await;
        assert!(matches!(result, Err(GenerationError::Configuration(_))));
    }
}
