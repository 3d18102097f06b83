//! Polling policy

use std::time::Duration;

/// How often to poll and for how long in total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two attempts
    pub interval: Duration,
    /// Wall-clock time after which polling gives up
    pub budget: Duration,
}

impl PollPolicy {
    pub const fn new(interval: Duration, budget: Duration) -> Self {
        Self { interval, budget }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(300))
    }
}
