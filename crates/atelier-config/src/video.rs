use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level text-to-video configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoConfig {
    /// Video provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, VideoProviderConfig>,
}

/// Configuration for a single text-to-video provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: VideoProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
    /// Per-call timeout (e.g. "120s")
    #[serde(default)]
    pub timeout: Option<String>,
}

impl VideoProviderConfig {
    pub const fn new(provider_type: VideoProviderType) -> Self {
        Self {
            provider_type,
            api_key: None,
            base_url: None,
            model: None,
            timeout: None,
        }
    }
}

/// Supported text-to-video providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoProviderType {
    /// Hugging Face inference API text-to-video models
    Huggingface,
}
