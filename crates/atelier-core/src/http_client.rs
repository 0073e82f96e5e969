use std::{sync::OnceLock, time::Duration};

use reqwest::{Client, Response};

use crate::error::GenerationError;

/// Common HTTP client to reuse connections across providers
///
/// Per-call timeouts are set on each request since providers differ widely
/// (chat completions answer in seconds, text-to-video can take minutes).
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Some(Duration::from_secs(90)))
                .tcp_nodelay(true)
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "failed to build tuned HTTP client, using defaults");
                    Client::new()
                })
        })
        .clone()
}

/// Map a transport failure to a [`GenerationError::Network`]
pub fn network_error(provider: &str, error: &reqwest::Error) -> GenerationError {
    tracing::error!(provider = %provider, error = %error, "provider request failed");
    GenerationError::Network(format!("request to provider '{provider}' failed: {error}"))
}

/// Pass 2xx responses through, turn anything else into a provider error
pub async fn ensure_success(provider: &str, response: Response) -> Result<Response, GenerationError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    tracing::error!(provider = %provider, status = %status, "provider API error");

    Err(GenerationError::provider_http(status.as_u16(), &error_text))
}
