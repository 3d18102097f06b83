//! Storage connection string parsing
//!
//! Connection strings are `;`-separated `Key=Value` pairs, for example
//! `DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net`.

use crate::error::{ClientError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// How requests to the object store are authorized
#[derive(Clone, PartialEq, Eq)]
pub enum StorageCredential {
    /// Base64 account key used for Shared Key signing
    AccountKey(String),
    /// Pre-signed query string appended to every request
    SharedAccessSignature(String),
}

impl fmt::Debug for StorageCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageCredential::AccountKey(_) => write!(f, "AccountKey(***)"),
            StorageCredential::SharedAccessSignature(_) => write!(f, "SharedAccessSignature(***)"),
        }
    }
}

/// Parsed storage connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConnection {
    pub account_name: String,
    pub blob_endpoint: String,
    pub credential: StorageCredential,
}

impl FromStr for StorageConnection {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let pairs: HashMap<String, String> = s
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.split_once('=')
                    .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
                    .ok_or_else(|| {
                        ClientError::InvalidConnectionString(format!(
                            "expected Key=Value, got '{}'",
                            part
                        ))
                    })
            })
            .collect::<Result<_>>()?;

        let account_name = pairs
            .get("accountname")
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| ClientError::InvalidConnectionString("AccountName missing".into()))?;

        let credential = match (pairs.get("accountkey"), pairs.get("sharedaccesssignature")) {
            (Some(key), _) if !key.is_empty() => StorageCredential::AccountKey(key.clone()),
            (_, Some(sas)) if !sas.is_empty() => {
                StorageCredential::SharedAccessSignature(sas.trim_start_matches('?').to_string())
            }
            _ => {
                return Err(ClientError::InvalidConnectionString(
                    "AccountKey or SharedAccessSignature required".into(),
                ));
            }
        };

        let blob_endpoint = match pairs.get("blobendpoint").filter(|v| !v.is_empty()) {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let protocol = pairs
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL);
                let suffix = pairs
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                format!("{}://{}.blob.{}", protocol, account_name, suffix)
            }
        };

        Ok(Self {
            account_name,
            blob_endpoint,
            credential,
        })
    }
}
