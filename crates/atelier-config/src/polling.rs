use serde::Deserialize;

/// Asynchronous job polling parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Wait between two status checks (e.g. "1s")
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Status checks allowed before a job is declared timed out
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_interval() -> String {
    "1s".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_attempts() -> u32 {
    180
}
