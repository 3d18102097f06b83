//! Core domain types
//!
//! This module contains the core domain structures used across costcalc crates.
//! These types are shared between the runner (which drives the remote job) and
//! the CLI (which collects inputs and presents results).

pub mod form;
pub mod payload;
pub mod result;
pub mod run;
