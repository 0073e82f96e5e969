use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Incoming generation request
///
/// Only `prompt` is required; the remaining fields override the configured
/// generation defaults of whichever provider serves the request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationRequest {
    /// Text prompt
    #[serde(default)]
    pub prompt: String,
    /// Name of a configured provider to use instead of the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Model override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Output width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Output height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Sampling steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Reject requests without a usable prompt
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("prompt is required".to_string()));
        }
        Ok(())
    }
}
