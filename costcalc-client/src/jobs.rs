//! Job-related API endpoints

use crate::JobsClient;
use crate::error::Result;
use costcalc_core::domain::run::RunId;
use costcalc_core::dto::jobs::{GetRunResponse, RunNowRequest, RunNowResponse};

impl JobsClient {
    // =============================================================================
    // Run Lifecycle
    // =============================================================================

    /// Start a run of an existing job
    ///
    /// # Arguments
    /// * `req` - The job id and its parameters
    ///
    /// # Returns
    /// The response body; `run_id` may be absent if the service misbehaves
    pub async fn run_now(&self, req: &RunNowRequest) -> Result<RunNowResponse> {
        let url = format!("{}/api/2.1/jobs/run-now", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a run by ID
    ///
    /// # Arguments
    /// * `run_id` - The run identifier returned by [`JobsClient::run_now`]
    ///
    /// # Returns
    /// The run details, including its raw `state` object
    pub async fn get_run(&self, run_id: RunId) -> Result<GetRunResponse> {
        let url = format!("{}/api/2.1/jobs/runs/get", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("run_id", run_id.0)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
