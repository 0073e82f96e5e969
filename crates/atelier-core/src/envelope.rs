use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{GenerationError, HttpError};

/// Message attached to every response that carries canned content
pub const DEMO_MESSAGE: &str = "using demo content";

/// Outcome marker carried in every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Uniform JSON response body: `{"status": ..., <fields>}`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub status: Status,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            fields: Map::new(),
        }
    }

    /// Error body with the client-safe message and machine error type
    pub fn from_error(error: &GenerationError) -> Self {
        Self {
            status: Status::Error,
            fields: Map::new(),
        }
        .with("error", error.client_message())
        .with("error_type", error.error_type())
    }

    /// Add a field
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Add a field only when a value is present
    #[must_use]
    pub fn with_opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Flag the body as carrying canned demo content
    #[must_use]
    pub fn demo(self, demo: bool) -> Self {
        if demo {
            self.with("demo", true).with("message", DEMO_MESSAGE)
        } else {
            self
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
