use std::time::Duration;

use async_trait::async_trait;
use atelier_config::{VideoProviderConfig, parse_duration};
use atelier_core::{
    Artifact, Capability, Credential, GenerationError, GenerationRequest, Provider, Result, Submission,
    ensure_success, http_client, network_error,
};
use reqwest::{Client, header::CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde::Serialize;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "ali-vilab/text-to-video-ms-1.7b";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Hugging Face inference API text-to-video models
///
/// The model renders the whole clip before answering, so calls are slow and
/// use a long per-call timeout.
pub(crate) struct HuggingFaceVideoProvider {
    name: String,
    client: Client,
    credential: Credential,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl HuggingFaceVideoProvider {
    pub fn new(name: String, config: &VideoProviderConfig) -> anyhow::Result<Self> {
        let timeout = match config.timeout.as_deref() {
            Some(timeout) => parse_duration(timeout)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            name,
            client: http_client(),
            credential: Credential::resolve(config.api_key.as_ref(), false),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
        })
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[async_trait]
impl Provider for HuggingFaceVideoProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        Capability::Video
    }

    fn is_available(&self) -> bool {
        self.credential.is_usable()
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission> {
        let Some(api_key) = self.credential.key(&self.name)? else {
            return Err(GenerationError::missing_credential(&self.name));
        };

        let model = request.model.as_deref().unwrap_or(&self.model);

        tracing::debug!(provider = %self.name, model = %model, "sending text-to-video request");

        let response = self
            .client
            .post(format!("{}/models/{model}", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .timeout(self.timeout)
            .json(&InferenceRequest {
                inputs: &request.prompt,
            })
            .send()
            .await
            .map_err(|e| network_error(&self.name, &e))?;

        let response = ensure_success(&self.name, response).await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::MalformedResponse(format!(
                "expected video bytes, got JSON: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| network_error(&self.name, &e))?;

        if bytes.is_empty() {
            return Err(GenerationError::MalformedResponse("empty video response".to_string()));
        }

        tracing::debug!(provider = %self.name, size = bytes.len(), "video generated");

        Ok(Submission::Ready(Artifact::binary("video/mp4", bytes.to_vec())))
    }
}
