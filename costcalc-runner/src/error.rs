//! Error types for the estimate runner

use costcalc_client::ClientError;
use costcalc_core::domain::payload::PayloadError;
use costcalc_core::domain::run::RunId;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, EstimateError>;

/// Failures of an estimate, as surfaced to the caller
///
/// None of these are retried by the stage that raises them.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Required configuration missing or unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The job service rejected a call or could not be reached
    #[error("job service call failed: {message}")]
    RemoteInvocation {
        status: Option<u16>,
        message: String,
    },

    /// A response arrived but lacked a field we depend on
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The run finished without success
    #[error("run {run_id} did not succeed: {state}")]
    RemoteJobFailed {
        run_id: RunId,
        /// Terminal state object exactly as the job service reported it
        state: serde_json::Value,
    },

    /// The result document did not appear within the wait budget
    #[error("timed out after {waited:?} waiting for {path} ({attempts} attempts)")]
    ResultTimeout {
        path: String,
        attempts: u32,
        waited: Duration,
    },

    /// The object store refused our credentials
    #[error("object store refused access (status {status}): {message}")]
    StorageAccess { status: u16, message: String },

    /// An object store call failed for any other reason
    #[error("object store request failed: {0}")]
    Storage(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("artifact {}: {message}", .path.display())]
    Artifact { path: PathBuf, message: String },
}

impl From<ClientError> for EstimateError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ParseError(message) => EstimateError::MalformedResponse(message),
            ClientError::InvalidConnectionString(message) => EstimateError::Configuration(message),
            other => EstimateError::RemoteInvocation {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

/// Errors reported by object store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("access denied (status {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("object store unavailable: {0}")]
    Unavailable(String),
}

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        if err.is_not_found() {
            return StoreError::NotFound(err.to_string());
        }
        match err {
            ClientError::ApiError { status, message } if status == 401 || status == 403 => {
                StoreError::Unauthorized { status, message }
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

impl From<StoreError> for EstimateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unauthorized { status, message } => {
                EstimateError::StorageAccess { status, message }
            }
            other => EstimateError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_mapping() {
        let err: EstimateError = ClientError::api_error(400, "INVALID_PARAMETER_VALUE").into();
        assert!(matches!(
            err,
            EstimateError::RemoteInvocation {
                status: Some(400),
                ..
            }
        ));

        let err: EstimateError = ClientError::ParseError("not json".into()).into();
        assert!(matches!(err, EstimateError::MalformedResponse(_)));
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            StoreError::from(ClientError::NotFound("a/b".into())),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            StoreError::from(ClientError::api_error(403, "AuthenticationFailed")),
            StoreError::Unauthorized { status: 403, .. }
        ));
        assert!(matches!(
            StoreError::from(ClientError::api_error(500, "InternalError")),
            StoreError::Unavailable(_)
        ));

        let err: EstimateError = StoreError::Unauthorized {
            status: 401,
            message: "no".into(),
        }
        .into();
        assert!(matches!(err, EstimateError::StorageAccess { status: 401, .. }));
    }

    #[test]
    fn test_store_failures_are_not_blamed_on_job_service() {
        let err: EstimateError = StoreError::Unavailable("connection reset".into()).into();
        assert!(matches!(err, EstimateError::Storage(_)));
        assert_eq!(
            err.to_string(),
            "object store request failed: object store unavailable: connection reset"
        );

        let err: EstimateError = StoreError::NotFound("uploads/pdfs/brief.pdf".into()).into();
        assert!(matches!(err, EstimateError::Storage(_)));
        assert!(!err.to_string().contains("job service"));
    }

    #[test]
    fn test_failure_message_carries_upstream_state() {
        let err = EstimateError::RemoteJobFailed {
            run_id: RunId(42),
            state: serde_json::json!({"life_cycle_state": "TERMINATED", "result_state": "FAILED"}),
        };
        let message = err.to_string();
        assert!(message.contains("run 42"));
        assert!(message.contains("\"result_state\":\"FAILED\""));
    }
}
