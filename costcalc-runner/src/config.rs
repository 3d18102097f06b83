//! Runner configuration
//!
//! Defines all configurable parameters for the estimate runner including
//! job service and object store connections, polling intervals and timeouts.

use costcalc_client::{BlobClient, JobsClient, StorageConnection, http_client};
use std::fmt;
use std::time::Duration;
use tracing::warn;

use crate::error::{EstimateError, Result};

/// Container the remote job writes result documents to
pub const DEFAULT_RESULT_CONTAINER: &str = "finops-output";

/// Runner configuration
///
/// Connection settings are required; every timeout and interval has a default
/// so the runner can be tuned per deployment without code changes.
#[derive(Clone)]
pub struct Config {
    /// Job service base URL (e.g., "https://adb-123.azuredatabricks.net")
    pub workspace_url: String,

    /// Bearer credential for the job service
    pub token: String,

    /// Job to run for every estimate
    pub job_id: i64,

    /// Object store connection string
    pub storage_connection_string: String,

    /// Container artifacts are uploaded to
    pub upload_container: String,

    /// Container the remote job writes `result.json` to
    pub result_container: String,

    /// How often to poll the run status
    pub run_poll_interval: Duration,

    /// How often to look for the result document
    pub result_poll_interval: Duration,

    /// How long to wait for the result document in total
    pub result_timeout: Duration,

    /// Upper bound for one HTTP request
    pub request_timeout: Duration,

    /// Upper bound for establishing one HTTP connection
    pub connect_timeout: Duration,
}

impl Config {
    /// Creates a new configuration with default intervals and timeouts
    pub fn new(
        workspace_url: String,
        token: String,
        job_id: i64,
        storage_connection_string: String,
        upload_container: String,
    ) -> Self {
        Self {
            workspace_url,
            token,
            job_id,
            storage_connection_string,
            upload_container,
            result_container: DEFAULT_RESULT_CONTAINER.to_string(),
            run_poll_interval: Duration::from_secs(10),
            result_poll_interval: Duration::from_secs(5),
            result_timeout: Duration::from_secs(300), // 5 minutes
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DATABRICKS_WORKSPACE_URL (required)
    /// - DATABRICKS_TOKEN (required)
    /// - DATABRICKS_JOB_ID (required, integer)
    /// - AZURE_STORAGE_CONNECTION_STRING (required)
    /// - AZURE_BLOB_CONTAINER (required, upload container)
    /// - COSTCALC_RESULT_CONTAINER (optional, default: finops-output)
    /// - COSTCALC_RUN_POLL_INTERVAL (optional, seconds, default: 10)
    /// - COSTCALC_RESULT_POLL_INTERVAL (optional, seconds, default: 5)
    /// - COSTCALC_RESULT_TIMEOUT (optional, seconds, default: 300)
    /// - COSTCALC_REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - COSTCALC_CONNECT_TIMEOUT (optional, seconds, default: 10)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    EstimateError::Configuration(format!("Missing environment variable: {}", name))
                })
        };
        let seconds = |name: &str, default: u64| {
            let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
                return Duration::from_secs(default);
            };
            match value.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!(
                        variable = name,
                        %value,
                        default_secs = default,
                        "Expected whole seconds, using default"
                    );
                    Duration::from_secs(default)
                }
            }
        };

        let job_id = required("DATABRICKS_JOB_ID")?;
        let job_id = job_id.parse::<i64>().map_err(|_| {
            EstimateError::Configuration(format!(
                "DATABRICKS_JOB_ID must be an integer, got '{}'",
                job_id
            ))
        })?;

        let mut config = Self::new(
            required("DATABRICKS_WORKSPACE_URL")?,
            required("DATABRICKS_TOKEN")?,
            job_id,
            required("AZURE_STORAGE_CONNECTION_STRING")?,
            required("AZURE_BLOB_CONTAINER")?,
        );

        if let Some(container) = lookup("COSTCALC_RESULT_CONTAINER").filter(|c| !c.is_empty()) {
            config.result_container = container;
        }
        config.run_poll_interval = seconds("COSTCALC_RUN_POLL_INTERVAL", 10);
        config.result_poll_interval = seconds("COSTCALC_RESULT_POLL_INTERVAL", 5);
        config.result_timeout = seconds("COSTCALC_RESULT_TIMEOUT", 300);
        config.request_timeout = seconds("COSTCALC_REQUEST_TIMEOUT", 30);
        config.connect_timeout = seconds("COSTCALC_CONNECT_TIMEOUT", 10);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Err(EstimateError::Configuration(message.to_string()));

        if !self.workspace_url.starts_with("http://") && !self.workspace_url.starts_with("https://")
        {
            return invalid("workspace_url must start with http:// or https://");
        }

        if self.token.is_empty() {
            return invalid("token cannot be empty");
        }

        if self.upload_container.is_empty() || self.result_container.is_empty() {
            return invalid("container names cannot be empty");
        }

        if self.run_poll_interval.is_zero() || self.result_poll_interval.is_zero() {
            return invalid("poll intervals must be greater than 0");
        }

        if self.request_timeout.is_zero() || self.connect_timeout.is_zero() {
            return invalid("request timeouts must be greater than 0");
        }

        Ok(())
    }

    /// HTTP client honoring the configured request and connect timeouts
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(http_client(self.request_timeout, self.connect_timeout)?)
    }

    /// Client for the job service
    pub fn jobs_client(&self) -> Result<JobsClient> {
        Ok(JobsClient::with_client(
            &self.workspace_url,
            &self.token,
            self.http_client()?,
        ))
    }

    /// Client for one container of the storage account named in the
    /// connection string
    pub fn blob_client(&self, container: &str) -> Result<BlobClient> {
        let connection: StorageConnection = self.storage_connection_string.parse()?;
        Ok(BlobClient::new(
            &connection,
            container,
            self.request_timeout,
            self.connect_timeout,
        )?)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workspace_url", &self.workspace_url)
            .field("job_id", &self.job_id)
            .field("upload_container", &self.upload_container)
            .field("result_container", &self.result_container)
            .field("run_poll_interval", &self.run_poll_interval)
            .field("result_poll_interval", &self.result_poll_interval)
            .field("result_timeout", &self.result_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}
