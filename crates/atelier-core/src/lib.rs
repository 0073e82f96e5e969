//! Shared domain types for the Atelier gateway
//!
//! Every capability crate (image, script, video, avatar) speaks in terms of the
//! types defined here: a [`GenerationRequest`] goes into a [`Provider`], which
//! answers with a [`Submission`] or a [`GenerationError`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod artifact;
mod credential;
mod envelope;
mod error;
mod extract;
mod http_client;
mod job;
mod provider;
mod request;

pub use artifact::Artifact;
pub use credential::Credential;
pub use envelope::{DEMO_MESSAGE, Envelope, Status};
pub use error::{GenerationError, HttpError, MAX_ERROR_TEXT, Result};
pub use extract::JsonPayload;
pub use http_client::{ensure_success, http_client, network_error};
pub use job::{Job, JobStatus};
pub use provider::{Capability, Generated, JobSource, Provider, ProviderSet, Submission};
pub use request::GenerationRequest;
