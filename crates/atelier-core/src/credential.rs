use secrecy::{ExposeSecret, SecretString};

use crate::error::{GenerationError, Result};

/// Provider credential state, resolved once when the provider is built
#[derive(Debug, Clone)]
pub enum Credential {
    /// A usable API key
    Key(SecretString),
    /// No key, but the provider substitutes canned demo content
    DemoFallback,
    /// No key and no fallback; every request fails before touching the network
    Missing,
}

impl Credential {
    /// Resolve from an optional configured key
    ///
    /// Blank keys are treated as absent so that `{{ env.VAR | default("") }}`
    /// placeholders behave like an unset variable.
    pub fn resolve(api_key: Option<&SecretString>, demo_fallback: bool) -> Self {
        match api_key {
            Some(key) if !key.expose_secret().trim().is_empty() => Self::Key(key.clone()),
            _ if demo_fallback => Self::DemoFallback,
            _ => Self::Missing,
        }
    }

    /// Whether requests can be served (with real or demo content)
    pub const fn is_usable(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    /// Key to send upstream, `None` when demo content should be served
    ///
    /// A missing credential is a configuration error for `provider`, raised
    /// before any network call is made.
    pub fn key(&self, provider: &str) -> Result<Option<&SecretString>> {
        match self {
            Self::Key(key) => Ok(Some(key)),
            Self::DemoFallback => Ok(None),
            Self::Missing => Err(GenerationError::missing_credential(provider)),
        }
    }
}
