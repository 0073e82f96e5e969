use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    /// Overall budget for a single request, including any job polling (e.g. "5m")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            health: HealthConfig::default(),
            cors: None,
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> String {
    "5m".to_string()
}
