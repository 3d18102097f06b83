//! Jobs repository
//!
//! Handles communication with the job-execution service:
//! - Submitting a run of the estimation job
//! - Fetching the state of a run

use async_trait::async_trait;
use costcalc_client::JobsClient;
use costcalc_core::domain::run::RunId;
use costcalc_core::dto::jobs::{GetRunResponse, RunNowRequest, RunNowResponse};

use crate::error::Result;

/// Repository trait for run-related operations with the job service
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Submits a run of the configured job
    ///
    /// # Arguments
    /// * `parameter` - The serialized payload, passed as the job's only parameter
    async fn run_now(&self, parameter: String) -> Result<RunNowResponse>;

    /// Fetches the current details of a run
    ///
    /// # Arguments
    /// * `run_id` - The run to look up
    async fn get_run(&self, run_id: RunId) -> Result<GetRunResponse>;
}

/// HTTP implementation of JobRepository
pub struct HttpJobRepository {
    client: JobsClient,
    job_id: i64,
}

impl HttpJobRepository {
    /// Creates a new HTTP job repository
    ///
    /// # Arguments
    /// * `client` - Client for the job service
    /// * `job_id` - The job every estimate runs
    pub fn new(client: JobsClient, job_id: i64) -> Self {
        Self { client, job_id }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn run_now(&self, parameter: String) -> Result<RunNowResponse> {
        let req = RunNowRequest::with_parameter(self.job_id, parameter);
        Ok(self.client.run_now(&req).await?)
    }

    async fn get_run(&self, run_id: RunId) -> Result<GetRunResponse> {
        Ok(self.client.get_run(run_id).await?)
    }
}
