//! Costcalc Core
//!
//! Core types and abstractions for the consumption estimate runner.
//!
//! This crate contains:
//! - Domain types: Request payload, run state, result document, form session
//! - DTOs: Wire formats of the job-execution service

pub mod domain;
pub mod dto;
