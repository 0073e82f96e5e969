//! Text-to-image generation
//!
//! Providers answer either synchronously (`openai`, `huggingface`) or by
//! queueing a job that is polled to completion (`horde`).

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod provider;
mod server;

use std::sync::Arc;

use atelier_core::{Envelope, GenerationRequest, JsonPayload, Result};
use axum::{Router, extract::State, routing::post};

pub use server::{ImageGenServerBuilder, Server};

/// Build the image generation server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &atelier_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        ImageGenServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize image generation server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for image generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/generate-image", post(generate))
}

/// Handle image generation requests
async fn generate(
    State(server): State<Arc<Server>>,
    JsonPayload(request): JsonPayload<GenerationRequest>,
) -> Result<Envelope> {
    tracing::debug!("Image generation handler called");

    let generated = server.generate(&request).await?;

    tracing::debug!(provider = %generated.provider, "Image generation complete");

    Ok(Envelope::success()
        .with("image_url", generated.artifact.to_data_uri())
        .with("provider", generated.provider)
        .demo(generated.demo))
}
