//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::metrics::{Histogram, Meter};

/// Meter shared by every Atelier crate
pub fn meter() -> Meter {
    opentelemetry::global::meter("atelier")
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

// Generation metric names
pub const GENERATION_DURATION: &str = "generation.request.duration";
pub const GENERATION_COUNT: &str = "generation.request.count";

// Job polling metric names
pub const JOB_POLL_ATTEMPTS: &str = "job.poll.attempts";
pub const JOB_OUTCOME_COUNT: &str = "job.outcome.count";
