use std::time::Duration;

use async_trait::async_trait;
use atelier_config::ImageGenProviderConfig;
use atelier_core::{
    Artifact, Capability, GenerationError, GenerationRequest, Job, JobSource, JobStatus, Provider, Result, Submission,
    ensure_success, http_client, network_error,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{ImageParams, base_url};

const DEFAULT_BASE_URL: &str = "https://stablehorde.net/api/v2";

/// Key accepted by the Horde for anonymous, lowest-priority requests
const ANONYMOUS_KEY: &str = "0000000000";

const SAMPLER: &str = "k_euler_a";
const CFG_SCALE: f32 = 7.5;

/// Timeout for each individual submit, check or status call
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// AI Horde crowd-sourced Stable Diffusion
///
/// Requests are queued: `submit` returns a job id which is then polled
/// through [`JobSource`] until a worker has produced the image.
pub(crate) struct HordeProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: String,
    params: ImageParams,
}

impl HordeProvider {
    pub fn new(name: String, config: &ImageGenProviderConfig) -> Self {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .unwrap_or_else(|| {
                tracing::debug!(provider = %name, "no Horde key configured, using anonymous access");
                SecretString::from(ANONYMOUS_KEY)
            });

        let defaults = ImageParams {
            model: "stable_diffusion".to_string(),
            width: 512,
            height: 512,
            steps: 20,
        };

        Self {
            name,
            client: http_client(),
            api_key,
            base_url: base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
            params: ImageParams::configured(defaults, config),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .header("apikey", self.api_key.expose_secret())
            .timeout(CALL_TIMEOUT)
            .send()
            .await
            .map_err(|e| network_error(&self.name, &e))?;

        ensure_success(&self.name, response).await
    }

    fn malformed(&self, what: &str, error: &reqwest::Error) -> GenerationError {
        tracing::error!(provider = %self.name, error = %error, "failed to parse Horde {what} response");
        GenerationError::MalformedResponse(format!("invalid {what} response from provider '{}': {error}", self.name))
    }
}

#[derive(Serialize)]
struct HordeRequest<'a> {
    prompt: &'a str,
    params: HordeParams<'a>,
    models: [&'a str; 1],
    r2: bool,
    nsfw: bool,
}

#[derive(Serialize)]
struct HordeParams<'a> {
    width: u32,
    height: u32,
    steps: u32,
    sampler_name: &'a str,
    cfg_scale: f32,
    n: u32,
}

#[derive(Deserialize)]
struct HordeAccepted {
    id: Option<String>,
}

#[derive(Deserialize)]
struct HordeCheck {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    faulted: bool,
    #[serde(default = "possible")]
    is_possible: bool,
}

const fn possible() -> bool {
    true
}

#[derive(Deserialize)]
struct HordeStatus {
    #[serde(default)]
    generations: Vec<HordeGeneration>,
}

#[derive(Deserialize)]
struct HordeGeneration {
    #[serde(default)]
    img: String,
}

#[async_trait]
impl Provider for HordeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        Capability::Image
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission> {
        let params = self.params.for_request(request);

        let wire_request = HordeRequest {
            prompt: &request.prompt,
            params: HordeParams {
                width: params.width,
                height: params.height,
                steps: params.steps,
                sampler_name: SAMPLER,
                cfg_scale: CFG_SCALE,
                n: 1,
            },
            models: [params.model.as_str()],
            r2: false,
            nsfw: false,
        };

        tracing::debug!(provider = %self.name, model = %params.model, "submitting Horde generation");

        let response = self
            .client
            .post(format!("{}/generate/async", self.base_url))
            .header("apikey", self.api_key.expose_secret())
            .timeout(CALL_TIMEOUT)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| network_error(&self.name, &e))?;

        let accepted: HordeAccepted = ensure_success(&self.name, response)
            .await?
            .json()
            .await
            .map_err(|e| self.malformed("submit", &e))?;

        let id = accepted
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse(format!("provider '{}' returned no job id", self.name)))?;

        tracing::debug!(provider = %self.name, job_id = %id, "Horde job accepted");

        Ok(Submission::Pending(Job::new(id)))
    }

    fn jobs(&self) -> Option<&dyn JobSource> {
        Some(self)
    }
}

#[async_trait]
impl JobSource for HordeProvider {
    async fn check(&self, job: &Job) -> Result<JobStatus> {
        let check: HordeCheck = self
            .get(&format!("{}/generate/check/{}", self.base_url, job.id()))
            .await?
            .json()
            .await
            .map_err(|e| self.malformed("check", &e))?;

        Ok(if check.faulted || !check.is_possible {
            JobStatus::Failed
        } else if check.done {
            JobStatus::Done
        } else {
            JobStatus::Pending
        })
    }

    async fn fetch(&self, job: &Job) -> Result<Vec<Artifact>> {
        let status: HordeStatus = self
            .get(&format!("{}/generate/status/{}", self.base_url, job.id()))
            .await?
            .json()
            .await
            .map_err(|e| self.malformed("status", &e))?;

        Ok(status
            .generations
            .into_iter()
            .map(|generation| Artifact::encoded("image/webp", generation.img))
            .collect())
    }
}
