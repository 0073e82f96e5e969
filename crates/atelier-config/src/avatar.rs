use secrecy::SecretString;
use serde::Deserialize;

/// Talking-avatar video provider (`HeyGen`)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AvatarConfig {
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Avatar used when a request names none
    #[serde(default)]
    pub default_avatar_id: Option<String>,
    /// Voice used when a request names none
    #[serde(default)]
    pub default_voice_id: Option<String>,
    /// Per-call timeout (e.g. "30s")
    #[serde(default)]
    pub timeout: Option<String>,
}
