use atelier_config::ScriptProviderType;
use atelier_core::{Capability, Generated, GenerationError, GenerationRequest, Provider, ProviderSet, Result};
use atelier_jobs::{Coordinator, PollPolicy};

use crate::provider::openai::OpenAiScriptProvider;

/// Script writer server that routes requests to the appropriate provider
pub struct Server {
    providers: ProviderSet,
    coordinator: Coordinator,
}

impl Server {
    pub fn new(providers: ProviderSet, coordinator: Coordinator) -> Self {
        Self { providers, coordinator }
    }

    /// Write a script for the prompt
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generated> {
        request.validate()?;

        let provider = self.providers.select(request.provider.as_deref())?;
        let generated = self.coordinator.run(provider, request).await?;

        if generated.artifact.as_text().is_none() {
            return Err(GenerationError::MalformedResponse(format!(
                "provider '{}' did not return text",
                generated.provider
            )));
        }

        Ok(generated)
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Whether any provider can serve requests
    pub fn is_available(&self) -> bool {
        self.providers.is_available()
    }
}

/// Builder for constructing the script server from configuration
pub struct ScriptServerBuilder<'a> {
    config: &'a atelier_config::Config,
}

impl<'a> ScriptServerBuilder<'a> {
    pub fn new(config: &'a atelier_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let mut providers: Vec<Box<dyn Provider>> = Vec::new();

        for (name, provider_config) in &self.config.script.providers {
            tracing::debug!("Initializing script provider: {name}");

            let provider: Box<dyn Provider> = match provider_config.provider_type {
                ScriptProviderType::Openai => Box::new(OpenAiScriptProvider::new(name.clone(), provider_config)),
            };

            if !provider.is_available() {
                tracing::warn!(provider = %name, "script provider has no API key and no demo fallback");
            }

            providers.push(provider);
        }

        tracing::debug!("Script server initialized with {} provider(s)", providers.len());

        Ok(Server::new(
            ProviderSet::new(Capability::Script, providers),
            Coordinator::new(PollPolicy::from_config(&self.config.polling)?),
        ))
    }
}
