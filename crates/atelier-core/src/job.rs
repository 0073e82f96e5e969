use std::time::Duration;

use jiff::Timestamp;
use serde::Serialize;

/// Provider-reported state of an asynchronous job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Done,
    Failed,
}

/// One outstanding asynchronous generation
///
/// Lives for a single request; never persisted.
#[derive(Debug, Clone)]
pub struct Job {
    id: String,
    status: JobStatus,
    created_at: Timestamp,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn status(&self) -> JobStatus {
        self.status
    }

    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub const fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    /// Wall-clock time since the job was submitted
    pub fn elapsed(&self) -> Duration {
        Timestamp::now()
            .duration_since(self.created_at)
            .try_into()
            .unwrap_or_default()
    }
}
