//! Estimate orchestration
//!
//! Chains the launcher, the watcher and the fetcher. Any failure ends the
//! estimate; nothing is retried at this level.

use costcalc_core::domain::payload::RequestPayload;
use costcalc_core::domain::run::RunId;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::repository::{BlobResultStore, HttpJobRepository, JobRepository, ResultStore};
use crate::service::{
    DEFAULT_RUN_POLL_INTERVAL, PollPolicy, fetch_result_reference, launch, wait_for_run,
};

/// Runs estimates end to end
///
/// Holds no per-estimate state, so one instance can serve any number of
/// estimates.
pub struct Estimator {
    jobs: Arc<dyn JobRepository>,
    results: Arc<dyn ResultStore>,
    run_poll_interval: Duration,
    result_policy: PollPolicy,
}

impl Estimator {
    /// Creates an estimator with default polling
    pub fn new(jobs: Arc<dyn JobRepository>, results: Arc<dyn ResultStore>) -> Self {
        Self {
            jobs,
            results,
            run_poll_interval: DEFAULT_RUN_POLL_INTERVAL,
            result_policy: PollPolicy::default(),
        }
    }

    /// Creates an estimator talking to the services named in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let jobs = HttpJobRepository::new(config.jobs_client()?, config.job_id);
        let results = BlobResultStore::new(config.blob_client(&config.result_container)?);

        Ok(Self::new(Arc::new(jobs), Arc::new(results))
            .with_run_poll_interval(config.run_poll_interval)
            .with_result_policy(PollPolicy::new(
                config.result_poll_interval,
                config.result_timeout,
            )))
    }

    pub fn with_run_poll_interval(mut self, interval: Duration) -> Self {
        self.run_poll_interval = interval;
        self
    }

    pub fn with_result_policy(mut self, policy: PollPolicy) -> Self {
        self.result_policy = policy;
        self
    }

    pub fn result_policy(&self) -> PollPolicy {
        self.result_policy
    }

    /// Triggers a run, waits for it and returns the result reference
    pub async fn estimate(&self, payload: &RequestPayload) -> Result<String> {
        let run_id = self.submit(payload).await?;
        self.wait(run_id).await?;
        let reference = self.fetch(payload).await?;

        info!(%run_id, reference = %reference, "Estimate ready");
        Ok(reference)
    }

    /// Triggers a run only
    pub async fn submit(&self, payload: &RequestPayload) -> Result<RunId> {
        launch(self.jobs.as_ref(), payload).await
    }

    /// Waits for a run only
    pub async fn wait(&self, run_id: RunId) -> Result<()> {
        wait_for_run(self.jobs.as_ref(), run_id, self.run_poll_interval).await
    }

    /// Polls for the result document only
    pub async fn fetch(&self, payload: &RequestPayload) -> Result<String> {
        fetch_result_reference(self.results.as_ref(), payload, self.result_policy).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimateError;
    use crate::testing::{MemoryStore, ScriptedJobs, state};

    const DOC: &[u8] = br#"{"drive_link": "https://example.com/x"}"#;

    fn payload() -> RequestPayload {
        RequestPayload::builder("acme", "q1").build().unwrap()
    }

    fn successful_run() -> Arc<ScriptedJobs> {
        Arc::new(ScriptedJobs::new(
            Some(42),
            vec![
                state("PENDING", None),
                state("RUNNING", None),
                state("TERMINATED", Some("SUCCESS")),
            ],
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_estimate_returns_result_reference() {
        let jobs = successful_run();
        let store = Arc::new(MemoryStore::new());
        store.put("acme/q1/result.json", DOC);

        let estimator = Estimator::new(jobs.clone(), store.clone());
        let link = estimator.estimate(&payload()).await.unwrap();

        assert_eq!(link, "https://example.com/x");
        assert_eq!(jobs.submitted().len(), 1);
        assert_eq!(jobs.polls(), 3);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_never_reads_results() {
        let jobs = Arc::new(ScriptedJobs::new(
            Some(42),
            vec![state("RUNNING", None), state("TERMINATED", Some("FAILED"))],
        ));
        let store = Arc::new(MemoryStore::new());
        store.put("acme/q1/result.json", DOC);

        let estimator = Estimator::new(jobs, store.clone());
        let err = estimator.estimate(&payload()).await.unwrap_err();

        assert!(matches!(
            err,
            EstimateError::RemoteJobFailed {
                run_id: RunId(42),
                ..
            }
        ));
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_result_times_out() {
        let store = Arc::new(MemoryStore::new());
        let estimator = Estimator::new(successful_run(), store.clone()).with_result_policy(
            PollPolicy::new(Duration::from_millis(500), Duration::from_secs(1)),
        );

        let err = estimator.estimate(&payload()).await.unwrap_err();

        assert!(matches!(err, EstimateError::ResultTimeout { .. }));
        assert_eq!(store.reads(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_submission_stops_estimate() {
        let jobs = Arc::new(ScriptedJobs::new(Some(42), vec![]).reject_submission(400));
        let store = Arc::new(MemoryStore::new());

        let estimator = Estimator::new(jobs.clone(), store.clone());
        let err = estimator.estimate(&payload()).await.unwrap_err();

        assert!(matches!(err, EstimateError::RemoteInvocation { .. }));
        assert_eq!(jobs.polls(), 0);
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_estimate_matches_direct_fetch() {
        let store = Arc::new(MemoryStore::new());
        store.put("acme/q1/result.json", DOC);

        let estimator = Estimator::new(successful_run(), store.clone());
        let composed = estimator.estimate(&payload()).await.unwrap();
        let direct = fetch_result_reference(store.as_ref(), &payload(), PollPolicy::default())
            .await
            .unwrap();

        assert_eq!(composed, direct);
    }
}
