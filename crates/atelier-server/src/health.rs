use std::sync::Arc;

use atelier_avatar::AvatarState;
use atelier_core::ProviderSet;
use atelier_video::Studio;
use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Map, Value};

/// Everything the health check reports on
#[derive(Clone)]
pub(crate) struct HealthState {
    pub image: Arc<atelier_imagegen::Server>,
    pub script: Arc<atelier_script::Server>,
    pub studio: Arc<Studio>,
    pub avatar: Arc<AvatarState>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthReport {
    status: &'static str,
    image: bool,
    script: bool,
    video: bool,
    avatar: bool,
    providers: Map<String, Value>,
}

impl HealthState {
    /// A capability is healthy when at least one provider holds a usable
    /// credential or serves demo content
    pub fn report(&self) -> HealthReport {
        let sets: [&ProviderSet; 3] = [
            self.image.providers(),
            self.script.providers(),
            self.studio.video().providers(),
        ];

        let mut providers = Map::new();
        for (name, available) in sets.into_iter().flat_map(ProviderSet::availability) {
            let known = providers.get(name).and_then(Value::as_bool).unwrap_or(false);
            providers.insert(name.to_string(), Value::Bool(known || available));
        }

        HealthReport {
            status: "ok",
            image: self.image.is_available(),
            script: self.script.is_available(),
            video: self.studio.video().is_available(),
            avatar: self.avatar.is_available(),
            providers,
        }
    }
}

/// Health check handler
pub(crate) async fn health_handler(State(state): State<HealthState>) -> Json<HealthReport> {
    Json(state.report())
}
