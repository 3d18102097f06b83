//! Repository layer
//!
//! Repositories are thin clients for the remote services the runner depends
//! on: the job-execution service and the object store. They provide simple,
//! focused interfaces without any polling or retry logic.
//!
//! All repositories are trait-based to enable testing and mocking.

mod artifacts;
mod jobs;
mod results;

// Re-export traits
pub use artifacts::ArtifactStore;
pub use jobs::JobRepository;
pub use results::ResultStore;

// Re-export implementations
pub use artifacts::BlobArtifactStore;
pub use jobs::HttpJobRepository;
pub use results::BlobResultStore;
