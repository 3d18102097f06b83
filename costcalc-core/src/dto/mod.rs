//! Data Transfer Objects for the job-execution service
//!
//! This module contains the request and response bodies exchanged with the
//! remote job-execution service. DTOs are kept separate from domain types so
//! the wire format can evolve without touching the orchestration logic.

pub mod jobs;
