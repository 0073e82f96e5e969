pub(crate) mod demo;
pub(crate) mod horde;
pub(crate) mod huggingface;
pub(crate) mod openai;

use atelier_config::ImageGenProviderConfig;
use atelier_core::GenerationRequest;

/// Generation parameters after applying configuration and request overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImageParams {
    pub model: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
}

impl ImageParams {
    /// Provider defaults with the configured overrides applied
    pub fn configured(defaults: Self, config: &ImageGenProviderConfig) -> Self {
        Self {
            model: config.model.clone().unwrap_or(defaults.model),
            width: config.width.unwrap_or(defaults.width),
            height: config.height.unwrap_or(defaults.height),
            steps: config.steps.unwrap_or(defaults.steps),
        }
    }

    /// Apply per-request overrides
    pub fn for_request(&self, request: &GenerationRequest) -> Self {
        Self {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            width: request.width.unwrap_or(self.width),
            height: request.height.unwrap_or(self.height),
            steps: request.steps.unwrap_or(self.steps),
        }
    }

    /// `WIDTHxHEIGHT`, as sized-image APIs expect it
    pub fn size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Base URL without a trailing slash
pub(crate) fn base_url(configured: Option<&str>, default: &str) -> String {
    configured.unwrap_or(default).trim_end_matches('/').to_string()
}
