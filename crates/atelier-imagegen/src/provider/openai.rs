use std::time::Duration;

use async_trait::async_trait;
use atelier_config::ImageGenProviderConfig;
use atelier_core::{
    Artifact, Capability, Credential, GenerationError, GenerationRequest, Provider, Result, Submission,
    ensure_success, http_client, network_error,
};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{ImageParams, base_url, demo};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// `OpenAI` image generation provider
pub(crate) struct OpenAiImageGenProvider {
    name: String,
    client: Client,
    credential: Credential,
    base_url: String,
    params: ImageParams,
}

impl OpenAiImageGenProvider {
    pub fn new(name: String, config: &ImageGenProviderConfig) -> Self {
        let defaults = ImageParams {
            model: "dall-e-3".to_string(),
            width: 1024,
            height: 1024,
            steps: 0,
        };

        Self {
            name,
            client: http_client(),
            credential: Credential::resolve(config.api_key.as_ref(), config.demo_fallback),
            base_url: base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
            params: ImageParams::configured(defaults, config),
        }
    }
}

/// Wire format for the `OpenAI` image generation API request
#[derive(Serialize)]
struct OpenAiImageRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    n: u32,
    size: String,
    response_format: &'a str,
}

/// Wire format for the `OpenAI` image generation API response
#[derive(Deserialize)]
struct OpenAiImageResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    b64_json: Option<String>,
}

#[async_trait]
impl Provider for OpenAiImageGenProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        Capability::Image
    }

    fn is_available(&self) -> bool {
        self.credential.is_usable()
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission> {
        let Some(api_key) = self.credential.key(&self.name)? else {
            return Ok(Submission::Demo(demo::placeholder_image()));
        };

        let params = self.params.for_request(request);

        let wire_request = OpenAiImageRequest {
            prompt: &request.prompt,
            model: &params.model,
            n: 1,
            size: params.size(),
            response_format: "b64_json",
        };

        tracing::debug!(
            provider = %self.name,
            model = %params.model,
            "sending image generation request"
        );

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| network_error(&self.name, &e))?;

        let wire_response: OpenAiImageResponse = ensure_success(&self.name, response)
            .await?
            .json()
            .await
            .map_err(|e| {
                tracing::error!(
                    provider = %self.name,
                    error = %e,
                    "failed to parse OpenAI image generation response"
                );
                GenerationError::MalformedResponse(format!("invalid image response: {e}"))
            })?;

        let image = wire_response
            .data
            .into_iter()
            .find_map(|d| d.b64_json)
            .filter(|b64| !b64.trim().is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse("image response contained no image data".to_string()))?;

        tracing::debug!(provider = %self.name, "image generation request complete");

        Ok(Submission::Ready(Artifact::encoded("image/png", image)))
    }
}
