#![allow(clippy::must_use_candidate)]

pub mod avatar;
pub mod cors;
mod env;
pub mod health;
pub mod imagegen;
mod loader;
pub mod polling;
pub mod script;
pub mod server;
pub mod telemetry;
pub mod video;

use serde::Deserialize;

pub use avatar::*;
pub use cors::*;
pub use health::*;
pub use imagegen::*;
pub use polling::*;
pub use script::*;
pub use server::*;
pub use telemetry::TelemetryConfig;
pub use video::*;

/// Top-level Atelier configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Asynchronous job polling
    #[serde(default)]
    pub polling: PollingConfig,
    /// Image generation providers
    #[serde(default)]
    pub imagegen: ImageGenConfig,
    /// Script writer providers
    #[serde(default)]
    pub script: ScriptConfig,
    /// Text-to-video providers
    #[serde(default)]
    pub video: VideoConfig,
    /// Talking-avatar provider
    #[serde(default)]
    pub avatar: Option<AvatarConfig>,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

/// Parse a human-readable duration such as `"1s"`, `"250ms"` or `"5m"`
///
/// # Errors
///
/// Returns an error if the string is not a valid duration
pub fn parse_duration(value: &str) -> anyhow::Result<std::time::Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid duration '{value}': {e}"))
}
