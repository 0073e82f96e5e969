//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use atelier_config::{
    AvatarConfig, Config, ImageGenProviderConfig, ImageGenProviderType, PollingConfig, ScriptProviderConfig,
    ScriptProviderType, VideoProviderConfig, VideoProviderType,
};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults and fast job polling
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));
        config.polling = PollingConfig {
            interval: "10ms".to_string(),
            max_attempts: 20,
        };

        Self { config }
    }

    /// Add a Horde image provider pointed at a mock backend
    pub fn with_horde(mut self, name: &str, base_url: &str) -> Self {
        let mut provider = ImageGenProviderConfig::new(ImageGenProviderType::Horde);
        provider.base_url = Some(base_url.to_owned());
        self.config.imagegen.providers.insert(name.to_owned(), provider);
        self
    }

    /// Add an `OpenAI` image provider
    pub fn with_openai_image(mut self, name: &str, base_url: &str, api_key: Option<&str>, demo_fallback: bool) -> Self {
        let mut provider = ImageGenProviderConfig::new(ImageGenProviderType::Openai);
        provider.base_url = Some(base_url.to_owned());
        provider.api_key = api_key.map(SecretString::from);
        provider.demo_fallback = demo_fallback;
        self.config.imagegen.providers.insert(name.to_owned(), provider);
        self
    }

    /// Add an `OpenAI` script provider
    pub fn with_openai_script(mut self, name: &str, base_url: &str, api_key: Option<&str>, demo_fallback: bool) -> Self {
        let mut provider = ScriptProviderConfig::new(ScriptProviderType::Openai);
        provider.base_url = Some(base_url.to_owned());
        provider.api_key = api_key.map(SecretString::from);
        provider.demo_fallback = demo_fallback;
        self.config.script.providers.insert(name.to_owned(), provider);
        self
    }

    /// Add a Hugging Face text-to-video provider
    pub fn with_hf_video(mut self, name: &str, base_url: &str, api_key: Option<&str>) -> Self {
        let mut provider = VideoProviderConfig::new(VideoProviderType::Huggingface);
        provider.base_url = Some(base_url.to_owned());
        provider.api_key = api_key.map(SecretString::from);
        self.config.video.providers.insert(name.to_owned(), provider);
        self
    }

    /// Configure the avatar facade
    pub fn with_avatar(mut self, base_url: &str, api_key: Option<&str>) -> Self {
        self.config.avatar = Some(AvatarConfig {
            api_key: api_key.map(SecretString::from),
            base_url: Some(base_url.to_owned()),
            ..AvatarConfig::default()
        });
        self
    }

    /// Override the polling interval and attempt ceiling
    pub fn with_polling(mut self, interval: &str, max_attempts: u32) -> Self {
        self.config.polling = PollingConfig {
            interval: interval.to_owned(),
            max_attempts,
        };
        self
    }

    /// Override the overall request timeout
    pub fn with_request_timeout(mut self, timeout: &str) -> Self {
        self.config.server.request_timeout = timeout.to_owned();
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}
