use atelier_config::ImageGenProviderType;
use atelier_core::{Capability, Generated, GenerationRequest, Provider, ProviderSet, Result};
use atelier_jobs::{Coordinator, PollPolicy};

use crate::provider::{
    horde::HordeProvider, huggingface::HuggingFaceImageProvider, openai::OpenAiImageGenProvider,
};

/// Image generation server that routes requests to the appropriate provider
pub struct Server {
    providers: ProviderSet,
    coordinator: Coordinator,
}

impl Server {
    pub fn new(providers: ProviderSet, coordinator: Coordinator) -> Self {
        Self { providers, coordinator }
    }

    /// Generate an image with the requested or first usable provider
    ///
    /// Queued providers are polled until the image is ready, so this can take
    /// as long as the configured polling budget.
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

/// Builder for constructing the image generation server from configuration
pub struct ImageGenServerBuilder<'a> {
    config: &'a atelier_config::Config,
}

impl<'a> ImageGenServerBuilder<'a> {
    pub fn new(config: &'a atelier_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let mut providers: Vec<Box<dyn Provider>> = Vec::new();

        for (name, provider_config) in &self.config.imagegen.providers {
            tracing::debug!("Initializing image generation provider: {name}");

            let provider: Box<dyn Provider> = match provider_config.provider_type {
                ImageGenProviderType::Horde => Box::new(HordeProvider::new(name.clone(), provider_config)),
                ImageGenProviderType::Openai => Box::new(OpenAiImageGenProvider::new(name.clone(), provider_config)),
                ImageGenProviderType::Huggingface => {
                    Box::new(HuggingFaceImageProvider::new(name.clone(), provider_config))
                }
            };

            if !provider.is_available() {
                tracing::warn!(provider = %name, "image provider has no API key and no demo fallback");
            }

            providers.push(provider);
        }

        if providers.is_empty() {
            tracing::debug!("No image generation providers configured");
        } else {
            tracing::debug!("Image generation server initialized with {} provider(s)", providers.len());
        }

        let policy = PollPolicy::from_config(&self.config.polling)?;

        Ok(Server::new(
            ProviderSet::new(Capability::Image, providers),
            Coordinator::new(policy),
        ))
    }
}
