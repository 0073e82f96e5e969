//! Asynchronous job polling
//!
//! Some providers accept a generation request, hand back a job id and finish
//! the work out-of-band. The [`Coordinator`] drives such a job through
//! `SUBMITTED -> POLLING* -> {COMPLETED, FAILED, TIMED_OUT}` and resolves
//! synchronous submissions without polling at all.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod coordinator;
mod policy;
mod sleeper;

pub use coordinator::{Coordinator, PollOutcome};
pub use policy::PollPolicy;
pub use sleeper::{Sleeper, TokioSleeper};
