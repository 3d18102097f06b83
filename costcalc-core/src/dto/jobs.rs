//! Job-execution service DTOs

use serde::{Deserialize, Serialize};

/// Request to start a run of an existing job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowRequest {
    pub job_id: i64,
    pub python_params: Vec<String>,
}

impl RunNowRequest {
    /// A run request carrying one string parameter
    pub fn with_parameter(job_id: i64, parameter: String) -> Self {
        Self {
            job_id,
            python_params: vec![parameter],
        }
    }
}

/// Response to a run request
///
/// `run_id` is optional here so that a response without it can be reported
/// as malformed rather than as a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowResponse {
    pub run_id: Option<i64>,
    pub number_in_job: Option<i64>,
}

/// Response to a run status query
///
/// Only the fields this system reads are typed; `state` is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRunResponse {
    pub run_id: Option<i64>,
    pub run_page_url: Option<String>,
    pub state: Option<serde_json::Value>,
}
