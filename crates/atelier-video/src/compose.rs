use std::{future::Future, sync::Arc, time::Duration};

use atelier_core::{Capability, Envelope, Generated, GenerationError, GenerationRequest, HttpError, Result};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use tokio::time::Instant;

use crate::server::Server;

/// Everything needed to answer video requests, composed ones included
pub struct Studio {
    script: Arc<atelier_script::Server>,
    image: Arc<atelier_imagegen::Server>,
    video: Arc<Server>,
    budget: Duration,
}

impl Studio {
    /// `budget` bounds a whole composition; parts still running when it
    /// expires are reported as failed
    pub fn new(
        script: Arc<atelier_script::Server>,
        image: Arc<atelier_imagegen::Server>,
        video: Arc<Server>,
        budget: Duration,
    ) -> Self {
        Self {
            script,
            image,
            video,
            budget,
        }
    }

    pub fn video(&self) -> &Server {
        &self.video
    }

    /// Run script, image and video generation in order for one prompt
    ///
    /// Only capabilities with a usable provider are attempted. A part that
    /// fails does not stop the following ones.
    pub async fn compose(&self, request: &GenerationRequest) -> Result<Composition> {
        request.validate()?;

        // Provider and model names are per capability, so they are not forwarded
        let part_request = GenerationRequest {
            prompt: request.prompt.clone(),
            width: request.width,
            height: request.height,
            steps: request.steps,
            ..GenerationRequest::default()
        };

        let deadline = Instant::now() + self.budget;
        let mut parts = Vec::with_capacity(3);

        if self.script.is_available() {
            let result = self.within(deadline, self.script.generate(&part_request)).await;
            parts.push((Capability::Script, result));
        }

        if self.image.is_available() {
            let result = self.within(deadline, self.image.generate(&part_request)).await;
            parts.push((Capability::Image, result));
        }

        if self.video.is_available() {
            let result = self.within(deadline, self.video.generate(&part_request)).await;
            parts.push((Capability::Video, result));
        }

        if parts.is_empty() {
            return Err(GenerationError::Configuration(
                "no script, image or video provider configured".to_string(),
            ));
        }

        for (capability, result) in &parts {
            if let Err(error) = result {
                tracing::warn!(capability = %capability, error = %error, "composition part failed");
            }
        }

        Ok(Composition { parts })
    }

    /// Run one part unless the composition deadline has already passed
    async fn within(&self, deadline: Instant, part: impl Future<Output = Result<Generated>>) -> Result<Generated> {
        if Instant::now() >= deadline {
            return Err(GenerationError::RequestTimeout(self.budget));
        }

        tokio::time::timeout_at(deadline, part)
            .await
            .unwrap_or(Err(GenerationError::RequestTimeout(self.budget)))
    }
}

/// Results of a composed generation, one per attempted capability
pub struct Composition {
    parts: Vec<(Capability, Result<Generated>)>,
}

impl Composition {
    /// Whether at least one part produced an artifact
    pub fn is_success(&self) -> bool {
        self.parts.iter().any(|(_, result)| result.is_ok())
    }

    /// Capabilities that were attempted, in order
    pub fn attempted(&self) -> impl Iterator<Item = Capability> + '_ {
        self.parts.iter().map(|(capability, _)| *capability)
    }
}

const fn field(capability: Capability) -> &'static str {
    match capability {
        Capability::Script => "script",
        Capability::Image => "image_url",
        Capability::Video => "video_url",
    }
}

impl IntoResponse for Composition {
    fn into_response(self) -> Response {
        let mut errors = Vec::new();
        let mut first_error = None;
        let mut providers = Map::new();
        let mut envelope = Envelope::success();
        let mut demo = false;

        for (capability, result) in self.parts {
            match result {
                Ok(generated) => {
                    let value = match generated.artifact.as_text() {
                        Some(text) => text.to_string(),
                        None => generated.artifact.to_data_uri(),
                    };
                    envelope = envelope.with(field(capability), value);
                    providers.insert(capability.to_string(), Value::from(generated.provider));
                    demo |= generated.demo;
                }
                Err(error) => {
                    errors.push(format!("{capability}: {error}"));
                    first_error.get_or_insert(error);
                }
            }
        }

        let summary = (!errors.is_empty()).then(|| errors.join("; "));

        if providers.is_empty()
            && let Some(error) = first_error
        {
            let envelope = Envelope::from_error(&error).with_opt("error", summary);
            return (error.status_code(), envelope).into_response();
        }

        envelope
            .with("providers", providers)
            .with_opt("error", summary)
            .demo(demo)
            .into_response()
    }
}
