use atelier_config::VideoProviderType;
use atelier_core::{Capability, Generated, GenerationRequest, Provider, ProviderSet, Result};
use atelier_jobs::{Coordinator, PollPolicy};

use crate::provider::huggingface::HuggingFaceVideoProvider;

/// Text-to-video server that routes requests to the appropriate provider
pub struct Server {
    providers: ProviderSet,
    coordinator: Coordinator,
}

impl Server {
    pub fn new(providers: ProviderSet, coordinator: Coordinator) -> Self {
        Self { providers, coordinator }
    }

    /// Render a video clip for the prompt
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generated> {
        request.validate()?;

        let provider = self.providers.select(request.provider.as_deref())?;

        self.coordinator.run(provider, request).await
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Whether any provider can serve requests
    pub fn is_available(&self) -> bool {
        self.providers.is_available()
    }
}

/// Builder for constructing the video server from configuration
pub struct VideoServerBuilder<'a> {
    config: &'a atelier_config::Config,
}

impl<'a> VideoServerBuilder<'a> {
    pub fn new(config: &'a atelier_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let mut providers: Vec<Box<dyn Provider>> = Vec::new();

        for (name, provider_config) in &self.config.video.providers {
            tracing::debug!("Initializing video provider: {name}");

            let provider: Box<dyn Provider> = match provider_config.provider_type {
                VideoProviderType::Huggingface => Box::new(
                    HuggingFaceVideoProvider::new(name.clone(), provider_config)
                        .map_err(|e| anyhow::anyhow!("video provider '{name}': {e}"))?,
                ),
            };

            if !provider.is_available() {
                tracing::warn!(provider = %name, "video provider has no API key");
            }

            providers.push(provider);
        }

        tracing::debug!("Video server initialized with {} provider(s)", providers.len());

        Ok(Server::new(
            ProviderSet::new(Capability::Video, providers),
            Coordinator::new(PollPolicy::from_config(&self.config.polling)?),
        ))
    }
}
