use std::time::Duration;

use atelier_config::{PollingConfig, parse_duration};

/// Polling cadence and ceiling for asynchronous jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between two status checks
    pub interval: Duration,
    /// Status checks allowed before the job is declared timed out
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }

    /// Build from configuration
    pub fn from_config(config: &PollingConfig) -> anyhow::Result<Self> {
        Ok(Self::new(parse_duration(&config.interval)?, config.max_attempts))
    }

    /// Longest time spent sleeping between checks for one job
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 180)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_bounds_wait_to_three_minutes() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 180);
        assert!(policy.max_wait() < Duration::from_secs(180));
    }

    #[test]
    fn from_config_parses_interval() {
        let config = PollingConfig {
            interval: "250ms".to_string(),
            max_attempts: 12,
        };
        let policy = PollPolicy::from_config(&config).unwrap();
        assert_eq!(policy, PollPolicy::new(Duration::from_millis(250), 12));
    }

    #[test]
    fn from_config_rejects_garbage() {
        let config = PollingConfig {
            interval: "whenever".to_string(),
            max_attempts: 12,
        };
        assert!(PollPolicy::from_config(&config).is_err());
    }
}
