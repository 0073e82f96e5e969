use std::time::Duration;

use async_trait::async_trait;
use atelier_config::ImageGenProviderConfig;
use atelier_core::{
    Artifact, Capability, Credential, GenerationError, GenerationRequest, Provider, Result, Submission,
    ensure_success, http_client, network_error,
};
use reqwest::{Client, header::CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde::Serialize;

use super::{ImageParams, base_url, demo};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// MIME type assumed when the inference API omits one
const DEFAULT_MIME: &str = "image/jpeg";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Hugging Face inference API text-to-image models
///
/// Answers synchronously with the raw image bytes.
pub(crate) struct HuggingFaceImageProvider {
    name: String,
    client: Client,
    credential: Credential,
    base_url: String,
    params: ImageParams,
}

impl HuggingFaceImageProvider {
    pub fn new(name: String, config: &ImageGenProviderConfig) -> Self {
        let defaults = ImageParams {
            model: "stabilityai/stable-diffusion-xl-base-1.0".to_string(),
            width: 1024,
            height: 1024,
            steps: 30,
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

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    width: u32,
    height: u32,
    num_inference_steps: u32,
}

#[async_trait]
impl Provider for HuggingFaceImageProvider {
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

        let wire_request = InferenceRequest {
            inputs: &request.prompt,
            parameters: InferenceParameters {
                width: params.width,
                height: params.height,
                num_inference_steps: params.steps,
            },
        };

        tracing::debug!(provider = %self.name, model = %params.model, "sending text-to-image request");

        let response = self
            .client
            .post(format!("{}/models/{}", self.base_url, params.model))
            .bearer_auth(api_key.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| network_error(&self.name, &e))?;

        let response = ensure_success(&self.name, response).await?;

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(DEFAULT_MIME, |value| value.split(';').next().unwrap_or(DEFAULT_MIME).trim())
            .to_string();

        // The inference API reports loading models and errors as JSON, sometimes with a 200
        if mime == "application/json" {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::MalformedResponse(format!(
                "expected image bytes, got JSON: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| network_error(&self.name, &e))?;

        if bytes.is_empty() {
            return Err(GenerationError::MalformedResponse("empty image response".to_string()));
        }

        Ok(Submission::Ready(Artifact::binary(mime, bytes.to_vec())))
    }
}
