use std::time::Duration;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use thiserror::Error;

use crate::envelope::Envelope;

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;

/// Longest provider error text carried back to clients, in characters
pub const MAX_ERROR_TEXT: usize = 500;

/// Trait for domain errors that can be converted to HTTP responses
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `invalid_request_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// Every way a generation request can fail
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Missing or malformed request fields
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Credential or provider setup is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested provider is not configured
    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    /// Provider answered with a non-2xx status
    #[error("Provider API error ({status}): {message}")]
    ProviderHttp { status: u16, message: String },

    /// Transport failure (timeout, refused connection, TLS)
    #[error("Connection error: {0}")]
    Network(String),

    /// Provider answered 2xx with a body we could not interpret
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Job never reported done within the attempt ceiling
    #[error("Job {job_id} did not finish after {attempts} status checks")]
    PollTimeout { job_id: String, attempts: u32 },

    /// Job finished but produced nothing
    #[error("Job {0} completed without producing any output")]
    EmptyResult(String),

    /// Provider reported the job itself as failed
    #[error("Job {job_id} failed: {reason}")]
    JobFailed { job_id: String, reason: String },

    /// The request ran out of its time budget
    #[error("Request did not complete within {0:?}")]
    RequestTimeout(Duration),
}

impl GenerationError {
    /// Build a provider HTTP error, truncating the provider's body
    pub fn provider_http(status: u16, body: &str) -> Self {
        Self::ProviderHttp {
            status,
            message: truncate(body.trim(), MAX_ERROR_TEXT),
        }
    }

    /// Error for a provider that has no usable credential
    pub fn missing_credential(provider: &str) -> Self {
        Self::Configuration(format!("API key required for provider '{provider}'"))
    }

    /// Whether retrying the same call later could plausibly succeed
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::ProviderHttp { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl HttpError for GenerationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::ProviderNotFound(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            // Provider and runtime failures are reported in-body
            _ => StatusCode::OK,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Configuration(_) => "configuration_error",
            Self::ProviderNotFound(_) => "not_found_error",
            Self::ProviderHttp { .. } | Self::MalformedResponse(_) => "provider_error",
            Self::Network(_) => "network_error",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::EmptyResult(_) => "empty_result",
            Self::JobFailed { .. } => "job_failed",
            Self::RequestTimeout(_) => "request_timeout",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(Envelope::from_error(&self))).into_response()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
