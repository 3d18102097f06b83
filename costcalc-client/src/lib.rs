//! Costcalc HTTP Clients
//!
//! Type-safe clients for the two remote services the estimate runner talks to:
//! - [`JobsClient`]: the job-execution service (run submission and run status)
//! - [`BlobClient`]: one container of the object store holding uploaded
//!   artifacts and result documents
//!
//! # Example
//!
//! ```no_run
//! use costcalc_client::JobsClient;
//! use costcalc_core::domain::run::RunId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), costcalc_client::ClientError> {
//!     let client = JobsClient::new("https://adb-123.azuredatabricks.net", "dapi-token")?;
//!
//!     let run = client.get_run(RunId(42)).await?;
//!     println!("Run state: {:?}", run.state);
//!     Ok(())
//! }
//! ```

pub mod blob;
pub mod connection;
pub mod error;
mod jobs;

// Re-export commonly used types
pub use blob::BlobClient;
pub use connection::StorageConnection;
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default timeout for a whole request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for establishing a connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with per-request timeouts
///
/// # Arguments
/// * `request_timeout` - Upper bound for one request, including the body
/// * `connect_timeout` - Upper bound for establishing the connection
pub fn http_client(request_timeout: Duration, connect_timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .build()
        .map_err(ClientError::from)
}

/// HTTP client for the job-execution service API
///
/// Every request carries the bearer credential the client was created with.
#[derive(Debug, Clone)]
pub struct JobsClient {
    /// Base URL of the workspace (e.g., "https://adb-123.azuredatabricks.net")
    base_url: String,
    /// Bearer credential
    token: String,
    /// HTTP client instance
    client: Client,
}

impl JobsClient {
    /// Create a new jobs client with default timeouts
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the workspace
    /// * `token` - The bearer credential
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = http_client(DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)?;
        Ok(Self::with_client(base_url, token, client))
    }

    /// Create a new jobs client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use costcalc_client::JobsClient;
    /// use reqwest::Client;
    ///
    /// let client = JobsClient::with_client("https://adb-123.azuredatabricks.net", "token", Client::new());
    /// assert_eq!(client.base_url(), "https://adb-123.azuredatabricks.net");
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the workspace
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
