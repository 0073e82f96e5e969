use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::GenerationError;

/// Body limit for generation requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

/// JSON body extractor that rejects with the uniform error envelope
///
/// Unlike `axum::Json`, malformed bodies produce a 400 with
/// `{"status": "error", ...}` instead of a plain-text 415/422.
pub struct JsonPayload<T>(pub T);

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for JsonPayload<T>
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let is_json = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if !is_json {
            return Err(reject("expected 'Content-Type: application/json'".to_string()));
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                reject(format!("request body is too large, limit is {BODY_LIMIT_BYTES} bytes"))
            } else {
                reject(format!("failed to read request body: {err}"))
            }
        })?;

        serde_json::from_slice::<T>(&bytes)
            .map(Self)
            .map_err(|e| reject(format!("failed to parse request body: {e}")))
    }
}

fn reject(message: String) -> Response {
    GenerationError::InvalidRequest(message).into_response()
}
