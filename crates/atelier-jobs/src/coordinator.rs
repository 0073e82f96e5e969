use std::{sync::Arc, time::Instant};

use atelier_core::{
    Artifact, GenerationError, GenerationRequest, Generated, Job, JobSource, JobStatus, Provider, Result, Submission,
};
use atelier_telemetry::{Counter, Histogram, KeyValue, metrics};

use crate::{
    policy::PollPolicy,
    sleeper::{Sleeper, TokioSleeper},
};

/// Terminal state of a polled job; exactly one is reached per job
#[derive(Debug)]
pub enum PollOutcome {
    /// Provider reported done and the fetch produced an artifact
    Completed { artifact: Artifact, attempts: u32 },
    /// Job failed, produced nothing, or its results could not be fetched
    Failed { error: GenerationError, attempts: u32 },
    /// The attempt ceiling was reached without the job finishing
    TimedOut { job_id: String, attempts: u32 },
}

impl PollOutcome {
    /// Status checks performed before reaching this state
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Completed { attempts, .. } | Self::Failed { attempts, .. } | Self::TimedOut { attempts, .. } => {
                *attempts
            }
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
            Self::TimedOut { .. } => "timed_out",
        }
    }

    pub fn into_result(self) -> Result<Artifact> {
        match self {
            Self::Completed { artifact, .. } => Ok(artifact),
            Self::Failed { error, .. } => Err(error),
            Self::TimedOut { job_id, attempts } => Err(GenerationError::PollTimeout { job_id, attempts }),
        }
    }
}

enum PollState {
    Submitted,
    Polling { attempts: u32 },
    Fetching { attempts: u32 },
    Terminal(PollOutcome),
}

struct PollMetrics {
    attempts: Histogram<u64>,
    outcomes: Counter<u64>,
    duration: Histogram<f64>,
    requests: Counter<u64>,
}

/// Drives submissions to an artifact, polling asynchronous jobs as needed
///
/// Never resubmits: a failed or timed-out job is reported to the caller, who
/// may decide to try again.
#[derive(Clone)]
pub struct Coordinator {
    policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
    metrics: Arc<PollMetrics>,
}

impl Coordinator {
    pub fn new(policy: PollPolicy) -> Self {
        Self::with_sleeper(policy, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(policy: PollPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        let meter = metrics::meter();

        let metrics = PollMetrics {
            attempts: meter
                .u64_histogram(metrics::JOB_POLL_ATTEMPTS)
                .with_description("Status checks performed per job")
                .build(),
            outcomes: meter
                .u64_counter(metrics::JOB_OUTCOME_COUNT)
                .with_description("Jobs by terminal state")
                .build(),
            duration: meter
                .f64_histogram(metrics::GENERATION_DURATION)
                .with_description("Generation request duration")
                .with_unit("s")
                .build(),
            requests: meter
                .u64_counter(metrics::GENERATION_COUNT)
                .with_description("Generation requests by provider and result")
                .build(),
        };

        Self {
            policy,
            sleeper,
            metrics: Arc::new(metrics),
        }
    }

    pub const fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submit a request to a provider and resolve it to an artifact
    ///
    /// Synchronous answers return immediately; a pending job is polled
    /// through the provider's [`JobSource`].
    pub async fn run(&self, provider: &dyn Provider, request: &GenerationRequest) -> Result<Generated> {
        let start = Instant::now();
        let result = self.resolve(provider, request).await;

        let attributes = [
            KeyValue::new("capability", provider.capability().to_string()),
            KeyValue::new("provider", provider.name().to_string()),
            KeyValue::new("success", result.is_ok()),
        ];
        metrics::record_duration(&self.metrics.duration, start, &attributes);
        self.metrics.requests.add(1, &attributes);

        tracing::debug!(
            provider = %provider.name(),
            elapsed_ms = start.elapsed().as_millis(),
            success = result.is_ok(),
            "generation finished"
        );

        result
    }

    async fn resolve(&self, provider: &dyn Provider, request: &GenerationRequest) -> Result<Generated> {
        let name = provider.name().to_string();

        tracing::debug!(provider = %name, capability = %provider.capability(), "submitting generation request");

        let (artifact, demo) = match provider.submit(request).await? {
            Submission::Ready(artifact) => (artifact, false),
            Submission::Demo(artifact) => {
                tracing::info!(provider = %name, "no credential configured, serving demo content");
                (artifact, true)
            }
            Submission::Pending(mut job) => {
                let Some(source) = provider.jobs() else {
                    return Err(GenerationError::MalformedResponse(format!(
                        "provider '{name}' returned a job but cannot be polled"
                    )));
                };

                (self.drive(source, &mut job).await.into_result()?, false)
            }
        };

        Ok(Generated {
            artifact,
            provider: name,
            demo,
        })
    }

    /// Poll a submitted job until it reaches a terminal state
    pub async fn drive(&self, source: &dyn JobSource, job: &mut Job) -> PollOutcome {
        let mut state = PollState::Submitted;

        loop {
            state = match state {
                PollState::Submitted => {
                    tracing::debug!(job_id = %job.id(), "job submitted, polling for completion");
                    PollState::Polling { attempts: 0 }
                }
                PollState::Polling { attempts } => self.poll(source, job, attempts).await,
                PollState::Fetching { attempts } => Self::fetch(source, job, attempts).await,
                PollState::Terminal(outcome) => {
                    self.record(job, &outcome);
                    return outcome;
                }
            };
        }
    }

    async fn poll(&self, source: &dyn JobSource, job: &mut Job, attempts: u32) -> PollState {
        if attempts >= self.policy.max_attempts {
            return PollState::Terminal(PollOutcome::TimedOut {
                job_id: job.id().to_string(),
                attempts,
            });
        }

        if attempts > 0 {
            self.sleeper.sleep(self.policy.interval).await;
        }

        let attempts = attempts + 1;

        match source.check(job).await {
            Ok(JobStatus::Pending) => {
                tracing::trace!(job_id = %job.id(), attempt = attempts, "job not done yet");
                PollState::Polling { attempts }
            }
            Ok(JobStatus::Done) => {
                job.set_status(JobStatus::Done);
                PollState::Fetching { attempts }
            }
            Ok(JobStatus::Failed) => {
                job.set_status(JobStatus::Failed);
                PollState::Terminal(PollOutcome::Failed {
                    error: GenerationError::JobFailed {
                        job_id: job.id().to_string(),
                        reason: "provider reported the job as failed".to_string(),
                    },
                    attempts,
                })
            }
            Err(error) if error.is_transient() => {
                tracing::warn!(job_id = %job.id(), attempt = attempts, error = %error, "status check failed, will retry");
                PollState::Polling { attempts }
            }
            Err(error) => {
                job.set_status(JobStatus::Failed);
                PollState::Terminal(PollOutcome::Failed { error, attempts })
            }
        }
    }

    async fn fetch(source: &dyn JobSource, job: &Job, attempts: u32) -> PollState {
        let outcome = match source.fetch(job).await {
            Ok(artifacts) => match artifacts.into_iter().find(|artifact| !artifact.is_empty()) {
                Some(artifact) => PollOutcome::Completed { artifact, attempts },
                None => PollOutcome::Failed {
                    error: GenerationError::EmptyResult(job.id().to_string()),
                    attempts,
                },
            },
            Err(error) => PollOutcome::Failed { error, attempts },
        };

        PollState::Terminal(outcome)
    }

    fn record(&self, job: &Job, outcome: &PollOutcome) {
        let attributes = [KeyValue::new("outcome", outcome.label())];
        self.metrics.attempts.record(u64::from(outcome.attempts()), &attributes);
        self.metrics.outcomes.add(1, &attributes);

        match outcome {
            PollOutcome::Completed { attempts, .. } => tracing::info!(
                job_id = %job.id(),
                attempts,
                elapsed_ms = job.elapsed().as_millis(),
                "job completed"
            ),
            PollOutcome::Failed { error, attempts } => tracing::warn!(
                job_id = %job.id(),
                attempts,
                error = %error,
                "job failed"
            ),
            PollOutcome::TimedOut { attempts, .. } => tracing::warn!(
                job_id = %job.id(),
                attempts,
                elapsed_ms = job.elapsed().as_millis(),
                "job timed out"
            ),
        }
    }
}
