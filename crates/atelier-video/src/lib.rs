//! Text-to-video generation and composed script/image/video requests

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod compose;
mod provider;
mod server;

use std::sync::Arc;

use atelier_core::{Envelope, GenerationRequest, JsonPayload, Result};
use axum::{Router, extract::State, routing::post};

pub use compose::{Composition, Studio};
pub use server::{Server, VideoServerBuilder};

/// Build the video studio from configuration
///
/// Composed requests reuse the already-built script and image servers. A
/// composition gets nine tenths of the server request timeout so that parts
/// which already finished are reported before the server gives up.
///
/// # Errors
///
/// Returns an error if the server fails to initialize or the request timeout
/// does not parse
pub fn build_studio(
    config: &atelier_config::Config,
    script: Arc<atelier_script::Server>,
    image: Arc<atelier_imagegen::Server>,
) -> anyhow::Result<Arc<Studio>> {
    let video = VideoServerBuilder::new(config)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize video server: {e}"))?;

    let request_timeout = atelier_config::parse_duration(&config.server.request_timeout)?;
    let budget = request_timeout - request_timeout / 10;

    Ok(Arc::new(Studio::new(script, image, Arc::new(video), budget)))
}

/// Create the endpoint router for video generation
pub fn endpoint_router() -> Router<Arc<Studio>> {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/generate-video", post(compose))
}

/// Direct text-to-video
async fn generate(
    State(studio): State<Arc<Studio>>,
    JsonPayload(request): JsonPayload<GenerationRequest>,
) -> Result<Envelope> {
    let generated = studio.video().generate(&request).await?;

    tracing::debug!(provider = %generated.provider, "Video generation complete");

    Ok(Envelope::success()
        .with("video_url", generated.artifact.to_data_uri())
        .with("provider", generated.provider))
}

/// Script, image and video for one prompt
async fn compose(
    State(studio): State<Arc<Studio>>,
    JsonPayload(request): JsonPayload<GenerationRequest>,
) -> Result<Composition> {
    let composition = studio.compose(&request).await?;

    tracing::debug!(
        success = composition.is_success(),
        parts = composition.attempted().count(),
        "Composed generation complete"
    );

    Ok(composition)
}
