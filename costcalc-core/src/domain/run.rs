//! Run domain types
//!
//! A run is one execution of the remote estimation job. This system never
//! changes a run's state; it only observes it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a run inside the job-execution service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub i64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RunId {
    fn from(id: i64) -> Self {
        RunId(id)
    }
}

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifeCycleState {
    Pending,
    Queued,
    Running,
    Terminating,
    Blocked,
    WaitingForRetry,
    Terminated,
    Skipped,
    InternalError,
    #[serde(other)]
    Unknown,
}

impl LifeCycleState {
    /// Whether no further transition can happen from this phase
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifeCycleState::Terminated | LifeCycleState::Skipped | LifeCycleState::InternalError
        )
    }
}

impl fmt::Display for LifeCycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifeCycleState::Pending => "PENDING",
            LifeCycleState::Queued => "QUEUED",
            LifeCycleState::Running => "RUNNING",
            LifeCycleState::Terminating => "TERMINATING",
            LifeCycleState::Blocked => "BLOCKED",
            LifeCycleState::WaitingForRetry => "WAITING_FOR_RETRY",
            LifeCycleState::Terminated => "TERMINATED",
            LifeCycleState::Skipped => "SKIPPED",
            LifeCycleState::InternalError => "INTERNAL_ERROR",
            LifeCycleState::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a terminated run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultState {
    Success,
    Failed,
    Timedout,
    Canceled,
    SuccessWithFailures,
    Excluded,
    MaximumConcurrentRunsReached,
    UpstreamFailed,
    UpstreamCanceled,
    #[serde(other)]
    Unknown,
}

impl ResultState {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultState::Success)
    }
}

/// Observed state of a run
///
/// `raw` keeps the state object exactly as the service returned it so that
/// failures can be reported with full upstream detail.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub life_cycle_state: LifeCycleState,
    pub result_state: Option<ResultState>,
    pub state_message: Option<String>,
    pub raw: serde_json::Value,
}

impl RunState {
    /// Builds a run state from the service's `state` object
    pub fn from_raw(raw: serde_json::Value) -> serde_json::Result<Self> {
        #[derive(Deserialize)]
        struct Fields {
            life_cycle_state: LifeCycleState,
            result_state: Option<ResultState>,
            state_message: Option<String>,
        }

        let fields: Fields = serde_json::from_value(raw.clone())?;
        Ok(Self {
            life_cycle_state: fields.life_cycle_state,
            result_state: fields.result_state,
            state_message: fields.state_message.filter(|m| !m.is_empty()),
            raw,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.life_cycle_state.is_terminal()
    }

    /// Terminal and classified as success
    pub fn is_success(&self) -> bool {
        self.is_terminal() && self.result_state.is_some_and(|r| r.is_success())
    }
}
