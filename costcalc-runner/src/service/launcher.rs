//! Job launcher
//!
//! Submits one run of the estimation job with the payload as its parameter.

use costcalc_core::domain::payload::RequestPayload;
use costcalc_core::domain::run::RunId;
use tracing::{debug, info};

use crate::error::{EstimateError, Result};
use crate::repository::JobRepository;

/// Triggers a run for `payload` and returns its identifier
///
/// Fails with [`EstimateError::RemoteInvocation`] if the job service rejects
/// the request and with [`EstimateError::MalformedResponse`] if it accepts it
/// without returning a run id.
pub async fn launch(jobs: &dyn JobRepository, payload: &RequestPayload) -> Result<RunId> {
    let parameter = payload.to_job_parameter()?;

    info!(
        client = payload.client_name(),
        use_case = payload.use_case_name(),
        "Triggering estimation job"
    );
    debug!(payload = %parameter, "Run parameter");

    let response = jobs.run_now(parameter).await?;
    let run_id = response.run_id.map(RunId).ok_or_else(|| {
        EstimateError::MalformedResponse("run_id missing from run-now response".to_string())
    })?;

    info!(%run_id, "Job triggered");
    Ok(run_id)
}
