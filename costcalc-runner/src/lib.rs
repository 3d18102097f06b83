//! Costcalc Runner
//!
//! Drives a consumption estimate through the remote job service.
//!
//! Architecture:
//! - Configuration: Load settings from environment variables
//! - Repositories: HTTP communication with the job service and the object store
//! - Services: Launch a run, wait for it, fetch its result; upload artifacts
//!
//! [`Estimator`] is the entry point: it triggers the estimation job with a
//! [`RequestPayload`](costcalc_core::domain::payload::RequestPayload), polls the
//! run until it terminates, then polls the result container until the job's
//! result document appears and returns the link it carries.

pub mod config;
pub mod error;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{EstimateError, Result, StoreError};
pub use service::{Estimator, PollPolicy};
