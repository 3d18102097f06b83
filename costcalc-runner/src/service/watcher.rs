//! Run watcher
//!
//! Polls the state of a run until it terminates. There is no overall
//! deadline here: a run is expected to terminate eventually, and the job
//! service enforces its own run timeouts.

use costcalc_core::domain::run::{LifeCycleState, RunId, RunState};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{EstimateError, Result};
use crate::repository::JobRepository;

/// Pause between two status queries unless configured otherwise
pub const DEFAULT_RUN_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Waits until `run_id` terminates
///
/// Returns `Ok(())` only when the run terminated with `SUCCESS`. Any other
/// terminal outcome fails with [`EstimateError::RemoteJobFailed`] carrying the
/// reported state. A failed status query is returned immediately, not retried.
pub async fn wait_for_run(
    jobs: &dyn JobRepository,
    run_id: RunId,
    poll_interval: Duration,
) -> Result<()> {
    info!(%run_id, ?poll_interval, "Waiting for run to complete");

    let mut last_phase: Option<LifeCycleState> = None;

    loop {
        let state = fetch_state(jobs, run_id).await?;
        let phase = state.life_cycle_state;

        if last_phase != Some(phase) {
            info!(%run_id, state = %phase, "Run state");
        } else {
            debug!(%run_id, state = %phase, "Run state unchanged");
        }
        if phase == LifeCycleState::Unknown {
            warn!(%run_id, raw = %state.raw, "Unrecognized run state, still waiting");
        }

        if state.is_terminal() {
            if state.is_success() {
                info!(%run_id, "Run completed successfully");
                return Ok(());
            }

            warn!(
                %run_id,
                result = ?state.result_state,
                message = state.state_message.as_deref().unwrap_or(""),
                "Run failed"
            );
            return Err(EstimateError::RemoteJobFailed {
                run_id,
                state: state.raw,
            });
        }

        last_phase = Some(phase);
        sleep(poll_interval).await;
    }
}

async fn fetch_state(jobs: &dyn JobRepository, run_id: RunId) -> Result<RunState> {
    let run = jobs.get_run(run_id).await?;

    let raw = run.state.ok_or_else(|| {
        EstimateError::MalformedResponse(format!("state missing for run {}", run_id))
    })?;

    RunState::from_raw(raw).map_err(|e| {
        EstimateError::MalformedResponse(format!("unreadable state for run {}: {}", run_id, e))
    })
}
