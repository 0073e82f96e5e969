use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level script writer configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    /// Script provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, ScriptProviderConfig>,
}

/// Configuration for a single chat-completion script writer
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: ScriptProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override (any OpenAI-compatible endpoint)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
    /// Completion length limit
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Replaces the built-in scriptwriter instructions
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Serve a canned script when no API key is configured
    #[serde(default)]
    pub demo_fallback: bool,
}

impl ScriptProviderConfig {
    pub const fn new(provider_type: ScriptProviderType) -> Self {
        Self {
            provider_type,
            api_key: None,
            base_url: None,
            model: None,
            max_tokens: None,
            temperature: None,
            system_prompt: None,
            demo_fallback: false,
        }
    }
}

/// Supported script writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptProviderType {
    /// OpenAI-compatible chat completions
    Openai,
}
