use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::{Config, parse_duration};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if durations do not parse, the polling ceiling is
    /// zero, or an API key cannot be sent in an HTTP header
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_polling()?;
        self.validate_credentials()?;
        self.warn_if_empty();
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        parse_duration(&self.server.request_timeout)
            .map_err(|e| anyhow::anyhow!("server.request_timeout: {e}"))?;

        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        Ok(())
    }

    fn validate_polling(&self) -> anyhow::Result<()> {
        parse_duration(&self.polling.interval).map_err(|e| anyhow::anyhow!("polling.interval: {e}"))?;

        if self.polling.max_attempts == 0 {
            anyhow::bail!("polling.max_attempts must be greater than 0");
        }

        for (name, provider) in &self.video.providers {
            if let Some(ref timeout) = provider.timeout {
                parse_duration(timeout).map_err(|e| anyhow::anyhow!("video provider '{name}' timeout: {e}"))?;
            }
        }

        if let Some(timeout) = self.avatar.as_ref().and_then(|a| a.timeout.as_ref()) {
            parse_duration(timeout).map_err(|e| anyhow::anyhow!("avatar.timeout: {e}"))?;
        }

        Ok(())
    }

    /// Blank keys are allowed (they disable the provider), malformed ones are not
    fn validate_credentials(&self) -> anyhow::Result<()> {
        let keys = self
            .imagegen
            .providers
            .iter()
            .map(|(name, p)| (format!("imagegen provider '{name}'"), p.api_key.as_ref()))
            .chain(
                self.script
                    .providers
                    .iter()
                    .map(|(name, p)| (format!("script provider '{name}'"), p.api_key.as_ref())),
            )
            .chain(
                self.video
                    .providers
                    .iter()
                    .map(|(name, p)| (format!("video provider '{name}'"), p.api_key.as_ref())),
            )
            .chain(std::iter::once((
                "avatar".to_string(),
                self.avatar.as_ref().and_then(|a| a.api_key.as_ref()),
            )));

        for (owner, key) in keys {
            if let Some(key) = key
                && !is_valid_key(key)
            {
                anyhow::bail!("{owner}: api_key contains whitespace or control characters");
            }
        }

        Ok(())
    }

    fn warn_if_empty(&self) {
        let nothing_configured = self.imagegen.providers.is_empty()
            && self.script.providers.is_empty()
            && self.video.providers.is_empty()
            && self.avatar.is_none();

        if nothing_configured {
            tracing::warn!("no providers configured, every generation endpoint will report a configuration error");
        }
    }
}

fn is_valid_key(key: &SecretString) -> bool {
    let key = key.expose_secret().trim();
    key.is_empty() || !key.chars().any(|c| c.is_whitespace() || c.is_control())
}
