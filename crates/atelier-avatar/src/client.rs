use std::time::Duration;

use atelier_config::{AvatarConfig, parse_duration};
use atelier_core::{GenerationError, Result, ensure_success, http_client, network_error};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://api.heygen.com/v2";
const DEFAULT_AVATAR_ID: &str = "wayne-public";
const DEFAULT_VOICE_ID: &str = "en_us_001";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "heygen";

/// Request to render a talking-avatar video
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateVideoRequest {
    /// Script the avatar speaks
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub avatar_id: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl CreateVideoRequest {
    /// Reject requests without text to speak
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("text is required".to_string()));
        }
        Ok(())
    }
}

/// Reject video ids that are not a single `[A-Za-z0-9_-]+` path segment
pub fn validate_video_id(video_id: &str) -> Result<()> {
    let valid = !video_id.is_empty()
        && video_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !valid {
        return Err(GenerationError::InvalidRequest(format!("invalid video id '{video_id}'")));
    }
    Ok(())
}

#[derive(Serialize)]
struct CreateVideoPayload<'a> {
    text: &'a str,
    avatar_id: &'a str,
    voice: VoicePayload<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Serialize)]
struct VoicePayload<'a> {
    voice_id: &'a str,
}

/// `HeyGen` v2 API client
///
/// Built once at startup; the credential is checked there, never per call.
#[derive(Clone)]
pub struct AvatarClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    default_avatar_id: String,
    default_voice_id: String,
    timeout: Duration,
}

impl AvatarClient {
    /// Build a client from configuration
    ///
    /// Returns `None` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timeout does not parse
    pub fn from_config(config: &AvatarConfig) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty())
        else {
            return Ok(None);
        };

        let timeout = match config.timeout.as_deref() {
            Some(timeout) => parse_duration(timeout)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Some(Self {
            client: http_client(),
            api_key,
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            default_avatar_id: config
                .default_avatar_id
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR_ID.to_string()),
            default_voice_id: config
                .default_voice_id
                .clone()
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            timeout,
        }))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Api-Key", self.api_key.expose_secret())
            .timeout(self.timeout)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| network_error(PROVIDER, &e))?;

        ensure_success(PROVIDER, response).await
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value> {
        self.send(builder).await?.json().await.map_err(|e| {
            tracing::error!(provider = PROVIDER, error = %e, "failed to parse avatar API response");
            GenerationError::MalformedResponse(format!("invalid avatar API response: {e}"))
        })
    }

    /// Start rendering a video
    pub async fn create_video(&self, request: &CreateVideoRequest) -> Result<Value> {
        request.validate()?;

        let payload = CreateVideoPayload {
            text: &request.text,
            avatar_id: request.avatar_id.as_deref().unwrap_or(&self.default_avatar_id),
            voice: VoicePayload {
                voice_id: request.voice_id.as_deref().unwrap_or(&self.default_voice_id),
            },
            title: request.title.as_deref(),
        };

        tracing::debug!(provider = PROVIDER, avatar_id = %payload.avatar_id, "creating avatar video");

        self.send_json(self.client.post(format!("{}/videos", self.base_url)).json(&payload))
            .await
    }

    /// Status and details of one video
    pub async fn get_video(&self, video_id: &str) -> Result<Value> {
        let url = self.video_url(video_id)?;
        self.send_json(self.client.get(url)).await
    }

    pub async fn list_videos(&self, limit: u32, offset: u32) -> Result<Value> {
        self.send_json(
            self.client
                .get(format!("{}/videos", self.base_url))
                .query(&[("limit", limit), ("offset", offset)]),
        )
        .await
    }

    pub async fn list_avatars(&self) -> Result<Value> {
        self.send_json(self.client.get(format!("{}/avatars", self.base_url)))
            .await
    }

    pub async fn list_voices(&self) -> Result<Value> {
        self.send_json(self.client.get(format!("{}/voices", self.base_url)))
            .await
    }

    pub async fn delete_video(&self, video_id: &str) -> Result<()> {
        let url = self.video_url(video_id)?;
        self.send(self.client.delete(url)).await?;

        tracing::info!(provider = PROVIDER, video_id = %video_id, "avatar video deleted");

        Ok(())
    }

    fn video_url(&self, video_id: &str) -> Result<String> {
        validate_video_id(video_id)?;
        Ok(format!("{}/videos/{video_id}", self.base_url))
    }
}
