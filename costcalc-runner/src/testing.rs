//! In-memory repositories for service tests

use async_trait::async_trait;
use costcalc_client::ClientError;
use costcalc_core::domain::run::RunId;
use costcalc_core::dto::jobs::{GetRunResponse, RunNowResponse};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{Result, StoreError};
use crate::repository::{ArtifactStore, JobRepository, ResultStore};

/// A run `state` object as the job service reports it
pub fn state(life_cycle_state: &str, result_state: Option<&str>) -> Value {
    match result_state {
        Some(result) => json!({
            "life_cycle_state": life_cycle_state,
            "result_state": result,
            "state_message": "",
        }),
        None => json!({ "life_cycle_state": life_cycle_state, "state_message": "" }),
    }
}

/// Job service that replays a fixed sequence of run states
///
/// The last state repeats once the script is exhausted. An empty script
/// reports runs without a `state` object.
pub struct ScriptedJobs {
    run_id: Option<i64>,
    states: Vec<Value>,
    reject_status: Option<u16>,
    failing_poll: Option<(usize, u16)>,
    submitted: Mutex<Vec<String>>,
    polls: AtomicUsize,
}

impl ScriptedJobs {
    pub fn new(run_id: Option<i64>, states: Vec<Value>) -> Self {
        Self {
            run_id,
            states,
            reject_status: None,
            failing_poll: None,
            submitted: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
        }
    }

    /// Every submission fails with `status`
    pub fn reject_submission(mut self, status: u16) -> Self {
        self.reject_status = Some(status);
        self
    }

    /// The `nth` status query (1-based) fails with `status`
    pub fn fail_poll(mut self, nth: usize, status: u16) -> Self {
        self.failing_poll = Some((nth, status));
        self
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobRepository for ScriptedJobs {
    async fn run_now(&self, parameter: String) -> Result<RunNowResponse> {
        if let Some(status) = self.reject_status {
            return Err(ClientError::api_error(status, "rejected").into());
        }
        self.submitted.lock().unwrap().push(parameter);
        Ok(RunNowResponse {
            run_id: self.run_id,
            number_in_job: Some(1),
        })
    }

    async fn get_run(&self, run_id: RunId) -> Result<GetRunResponse> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some((nth, status)) = self.failing_poll {
            if nth == poll {
                return Err(ClientError::api_error(status, "unavailable").into());
            }
        }

        let index = (poll - 1).min(self.states.len().saturating_sub(1));
        Ok(GetRunResponse {
            run_id: Some(run_id.0),
            run_page_url: None,
            state: self.states.get(index).cloned(),
        })
    }
}

struct StoredObject {
    visible_after_reads: usize,
    body: Vec<u8>,
}

/// Object store kept in memory
///
/// Serves as result store and artifact store. Counts every read.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    uploads: Mutex<Vec<(String, String)>>,
    reads: AtomicUsize,
    unavailable_reads: usize,
    denied: bool,
    read_delay: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `reads` reads fail as if the store were down
    pub fn unavailable_for(mut self, reads: usize) -> Self {
        self.unavailable_reads = reads;
        self
    }

    /// Every read takes `delay` before answering
    pub fn read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    /// Every read is refused
    pub fn deny_access(mut self) -> Self {
        self.denied = true;
        self
    }

    pub fn put(&self, path: &str, body: &[u8]) {
        self.put_after_reads(0, path, body);
    }

    /// Stores an object that only becomes visible after `reads` reads
    pub fn put_after_reads(&self, reads: usize, path: &str, body: &[u8]) {
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredObject {
                visible_after_reads: reads,
                body: body.to_vec(),
            },
        );
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// `(path, content type)` of every upload, in order
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|o| o.body.clone())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn read(&self, path: &str) -> std::result::Result<Vec<u8>, StoreError> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }

        if self.denied {
            return Err(StoreError::Unauthorized {
                status: 403,
                message: "AuthenticationFailed".to_string(),
            });
        }
        if read <= self.unavailable_reads {
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }

        self.objects
            .lock()
            .unwrap()
            .get(path)
            .filter(|o| read > o.visible_after_reads)
            .map(|o| o.body.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn upload(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<String, StoreError> {
        if self.denied {
            return Err(StoreError::Unauthorized {
                status: 403,
                message: "AuthenticationFailed".to_string(),
            });
        }

        self.uploads
            .lock()
            .unwrap()
            .push((path.to_string(), content_type.to_string()));
        self.put(path, &body);
        Ok(format!("memory://uploads/{}", path))
    }
}
