use async_trait::async_trait;
use serde::Serialize;

use crate::{
    artifact::Artifact,
    error::{GenerationError, Result},
    job::{Job, JobStatus},
    request::GenerationRequest,
};

/// Kind of content a provider generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Image,
    Script,
    Video,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Script => "script",
            Self::Video => "video",
        })
    }
}

/// What a provider hands back from a submission
#[derive(Debug)]
pub enum Submission {
    /// The artifact came back synchronously
    Ready(Artifact),
    /// Canned content substituted for a missing credential
    Demo(Artifact),
    /// The provider accepted a job that completes out-of-band
    Pending(Job),
}

/// A generated artifact together with where it came from
#[derive(Debug, Clone)]
pub struct Generated {
    pub artifact: Artifact,
    pub provider: String,
    pub demo: bool,
}

/// A third-party API performing generative work
#[async_trait]
pub trait Provider: Send + Sync {
    /// Configured provider name
    fn name(&self) -> &str;

    /// Kind of content this provider generates
    fn capability(&self) -> Capability;

    /// Whether the provider can serve requests with real or demo content
    fn is_available(&self) -> bool;

    /// Submit a generation request
    ///
    /// Performs exactly one outbound call, or none when the credential is
    /// missing.
    async fn submit(&self, request: &GenerationRequest) -> Result<Submission>;

    /// Job access for providers that answer with [`Submission::Pending`]
    fn jobs(&self) -> Option<&dyn JobSource> {
        None
    }
}

/// Status and result access for asynchronous jobs
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Query the provider for the job's current status
    async fn check(&self, job: &Job) -> Result<JobStatus>;

    /// Fetch the results of a finished job
    async fn fetch(&self, job: &Job) -> Result<Vec<Artifact>>;
}

/// The configured providers for one capability, in configuration order
pub struct ProviderSet {
    capability: Capability,
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderSet {
    pub fn new(capability: Capability, providers: Vec<Box<dyn Provider>>) -> Self {
        Self { capability, providers }
    }

    pub const fn capability(&self) -> Capability {
        self.capability
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether any provider can serve requests
    pub fn is_available(&self) -> bool {
        self.providers.iter().any(|p| p.is_available())
    }

    /// `(name, available)` for every configured provider
    pub fn availability(&self) -> impl Iterator<Item = (&str, bool)> {
        self.providers.iter().map(|p| (p.name(), p.is_available()))
    }

    /// Pick the provider for a request
    ///
    /// An explicitly requested provider must exist. Otherwise the first
    /// usable provider wins; if none is usable the first one is returned so
    /// that it reports its own configuration error.
    pub fn select(&self, requested: Option<&str>) -> Result<&dyn Provider> {
        if let Some(name) = requested {
            return self
                .providers
                .iter()
                .find(|p| p.name() == name)
                .map(|p| &**p)
                .ok_or_else(|| GenerationError::ProviderNotFound(name.to_string()));
        }

        self.providers
            .iter()
            .find(|p| p.is_available())
            .or_else(|| self.providers.first())
            .map(|p| &**p)
            .ok_or_else(|| GenerationError::Configuration(format!("no {} provider configured", self.capability)))
    }
}
