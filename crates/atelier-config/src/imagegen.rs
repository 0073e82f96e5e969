use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level image generation configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenConfig {
    /// Image generation provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, ImageGenProviderConfig>,
}

/// Configuration for a single image generation provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: ImageGenProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
    /// Image width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Image height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// Sampling steps
    #[serde(default)]
    pub steps: Option<u32>,
    /// Serve a canned placeholder image when no API key is configured
    #[serde(default)]
    pub demo_fallback: bool,
}

impl ImageGenProviderConfig {
    pub const fn new(provider_type: ImageGenProviderType) -> Self {
        Self {
            provider_type,
            api_key: None,
            base_url: None,
            model: None,
            width: None,
            height: None,
            steps: None,
            demo_fallback: false,
        }
    }
}

/// Supported image generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageGenProviderType {
    /// AI Horde crowd-sourced Stable Diffusion (asynchronous jobs)
    Horde,
    /// `OpenAI` image generation
    Openai,
    /// Hugging Face inference API text-to-image models
    Huggingface,
}
