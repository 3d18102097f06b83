//! Result fetcher
//!
//! Waits for the result document of a run to appear in the result store and
//! extracts the result reference from it.
//!
//! A missing object, an object store hiccup and an unreadable document all
//! mean "not ready yet" and are retried until the wait budget is spent. A
//! refused credential is fatal: it will not fix itself within the budget.

use costcalc_core::domain::payload::RequestPayload;
use costcalc_core::domain::result::{ResultDocument, ResultDocumentError};
use std::fmt;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info};

use crate::error::{EstimateError, Result, StoreError};
use crate::repository::ResultStore;
use crate::service::PollPolicy;

/// Least time one read is given, even when the budget is nearly spent
const MIN_READ_ALLOWANCE: Duration = Duration::from_secs(1);

/// Why an attempt did not produce a result reference
#[derive(Debug)]
enum NotReady {
    Missing,
    Unavailable(String),
    Malformed(ResultDocumentError),
}

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotReady::Missing => write!(f, "not written yet"),
            NotReady::Unavailable(reason) => write!(f, "store unavailable: {}", reason),
            NotReady::Malformed(reason) => write!(f, "{}", reason),
        }
    }
}

/// Polls for the result document of `payload` and returns its result reference
///
/// The first read happens immediately. After the budget is spent one last
/// read is made at the deadline before failing with
/// [`EstimateError::ResultTimeout`]. A read may not outlast the remaining
/// budget (but always gets at least one second), so a hanging store cannot
/// hold the call far past its deadline.
pub async fn fetch_result_reference(
    store: &dyn ResultStore,
    payload: &RequestPayload,
    policy: PollPolicy,
) -> Result<String> {
    let path = payload.result_path();
    let location = store.location(&path);

    info!(%location, budget = ?policy.budget, "Polling for result document");

    let started = Instant::now();
    let deadline = started + policy.budget;
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        debug!(attempt = attempts, %location, "Reading result document");

        let allowance = deadline
            .saturating_duration_since(Instant::now())
            .max(MIN_READ_ALLOWANCE);
        let attempt = match timeout(allowance, read_reference(store, &path)).await {
            Ok(attempt) => attempt?,
            Err(_) => Err(NotReady::Unavailable(format!(
                "read timed out after {:?}",
                allowance
            ))),
        };

        match attempt {
            Ok(reference) => {
                info!(attempts, %location, "Result document read");
                return Ok(reference);
            }
            Err(reason) => {
                info!(attempt = attempts, %reason, "Result not ready yet");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        sleep(policy.interval.min(deadline - now)).await;
    }

    Err(EstimateError::ResultTimeout {
        path: location,
        attempts,
        waited: started.elapsed(),
    })
}

/// One attempt: the outer error is fatal, the inner one means "retry"
async fn read_reference(
    store: &dyn ResultStore,
    path: &str,
) -> Result<std::result::Result<String, NotReady>> {
    let bytes = match store.read(path).await {
        Ok(bytes) => bytes,
        Err(StoreError::NotFound(_)) => return Ok(Err(NotReady::Missing)),
        Err(StoreError::Unavailable(reason)) => return Ok(Err(NotReady::Unavailable(reason))),
        Err(err @ StoreError::Unauthorized { .. }) => return Err(err.into()),
    };

    let reference = ResultDocument::parse(&bytes)
        .and_then(|doc| doc.reference().map(str::to_string))
        .map_err(NotReady::Malformed);

    Ok(reference)
}
