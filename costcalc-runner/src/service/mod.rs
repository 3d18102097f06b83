//! Service layer
//!
//! Services contain the estimate logic. They drive the repositories through
//! the run lifecycle: launch a run, wait for it to terminate, then wait for
//! its result document. Artifact upload lives here too, since it produces the
//! references the payload carries.

pub mod artifacts;
mod estimate;
pub mod fetcher;
pub mod launcher;
mod poll;
pub mod watcher;

pub use artifacts::{ArtifactKind, UploadedArtifact, prepare_payload, upload_artifacts};
pub use estimate::Estimator;
pub use fetcher::fetch_result_reference;
pub use launcher::launch;
pub use poll::PollPolicy;
pub use watcher::{DEFAULT_RUN_POLL_INTERVAL, wait_for_run};
