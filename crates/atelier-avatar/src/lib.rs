//! Talking-avatar videos through the `HeyGen` API
//!
//! A thin facade: each route forwards to one upstream call and wraps the
//! provider's JSON as `{"status": "success", "data": ...}`.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;

use std::sync::Arc;

use atelier_core::{Envelope, GenerationError, JsonPayload, Result};
use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;

pub use client::{AvatarClient, CreateVideoRequest, validate_video_id};

/// Shared state for the avatar routes
pub struct AvatarState {
    client: Option<AvatarClient>,
}

impl AvatarState {
    pub fn new(client: Option<AvatarClient>) -> Self {
        Self { client }
    }

    /// Whether an API key was configured
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&AvatarClient> {
        self.client
            .as_ref()
            .ok_or_else(|| GenerationError::missing_credential("heygen"))
    }
}

/// Build the avatar state from configuration
///
/// # Errors
///
/// Returns an error if the avatar configuration is invalid
pub fn build_state(config: &atelier_config::Config) -> anyhow::Result<Arc<AvatarState>> {
    let client = match &config.avatar {
        Some(avatar) => AvatarClient::from_config(avatar)
            .map_err(|e| anyhow::anyhow!("Failed to initialize avatar client: {e}"))?,
        None => None,
    };

    if client.is_none() {
        tracing::debug!("No avatar API key configured, avatar routes will report a configuration error");
    }

    Ok(Arc::new(AvatarState::new(client)))
}

/// Create the endpoint router for the avatar facade
pub fn endpoint_router() -> Router<Arc<AvatarState>> {
    Router::new()
        .route("/generate-video", post(create_video))
        .route("/video/{video_id}", get(get_video).delete(delete_video))
        .route("/videos", get(list_videos))
        .route("/avatars", get(list_avatars))
        .route("/voices", get(list_voices))
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    offset: u32,
}

const fn default_limit() -> u32 {
    10
}

fn data(value: serde_json::Value) -> Envelope {
    Envelope::success().with("data", value)
}

async fn create_video(
    State(state): State<Arc<AvatarState>>,
    JsonPayload(request): JsonPayload<CreateVideoRequest>,
) -> Result<Envelope> {
    request.validate()?;
    state.client()?.create_video(&request).await.map(data)
}

async fn get_video(State(state): State<Arc<AvatarState>>, Path(video_id): Path<String>) -> Result<Envelope> {
    validate_video_id(&video_id)?;
    state.client()?.get_video(&video_id).await.map(data)
}

async fn list_videos(State(state): State<Arc<AvatarState>>, Query(paging): Query<Paging>) -> Result<Envelope> {
    state
        .client()?
        .list_videos(paging.limit, paging.offset)
        .await
        .map(data)
}

async fn list_avatars(State(state): State<Arc<AvatarState>>) -> Result<Envelope> {
    state.client()?.list_avatars().await.map(data)
}

async fn list_voices(State(state): State<Arc<AvatarState>>) -> Result<Envelope> {
    state.client()?.list_voices().await.map(data)
}

async fn delete_video(State(state): State<Arc<AvatarState>>, Path(video_id): Path<String>) -> Result<Envelope> {
    validate_video_id(&video_id)?;
    state.client()?.delete_video(&video_id).await?;

    Ok(Envelope::success().with("deleted", true).with("video_id", video_id))
}
