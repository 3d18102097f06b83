//! Object store client
//!
//! Reads and writes whole blobs of one container. Production clients talk to
//! Azure Blob Storage through `object_store`, authorized with the account key
//! or the SAS token of the connection string.

use object_store::azure::MicrosoftAzureBuilder;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, PutOptions, PutPayload, RetryConfig,
};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::connection::{StorageConnection, StorageCredential};
use crate::error::{ClientError, Result};

/// Client for one container of a storage account
#[derive(Debug, Clone)]
pub struct BlobClient {
    store: Arc<dyn ObjectStore>,
    container: String,
    /// Public URL of the container, used to report where uploads landed
    container_url: Url,
}

impl BlobClient {
    /// Create a blob client for `container` from a parsed connection
    ///
    /// # Arguments
    /// * `connection` - Account, endpoint and credential
    /// * `container` - Container every path is resolved in
    /// * `request_timeout` - Upper bound for one request
    /// * `connect_timeout` - Upper bound for establishing a connection
    pub fn new(
        connection: &StorageConnection,
        container: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let container = container.into();
        let container_url = container_url(&connection.blob_endpoint, &container)?;

        let options = ClientOptions::new()
            .with_timeout(request_timeout)
            .with_connect_timeout(connect_timeout);

        // Callers poll on their own schedule; keep the store's retries short
        let retry = RetryConfig {
            max_retries: 2,
            retry_timeout: request_timeout,
            ..Default::default()
        };

        let builder = MicrosoftAzureBuilder::new()
            .with_account(&connection.account_name)
            .with_container_name(&container)
            .with_endpoint(connection.blob_endpoint.clone())
            .with_allow_http(connection.blob_endpoint.starts_with("http://"))
            .with_client_options(options)
            .with_retry(retry);

        let builder = match &connection.credential {
            StorageCredential::AccountKey(key) => builder.with_access_key(key),
            StorageCredential::SharedAccessSignature(sas) => {
                builder.with_sas_authorization(sas_query_pairs(sas))
            }
        };

        let store = builder
            .build()
            .map_err(|e| ClientError::InvalidConnectionString(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), container, container_url))
    }

    /// Create a blob client on top of any object store
    ///
    /// This allows you to use an in-memory or local store, e.g. in tests.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        container: impl Into<String>,
        container_url: Url,
    ) -> Self {
        Self {
            store,
            container: container.into(),
            container_url,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Public URL of a blob, without any credential in it
    ///
    /// # Arguments
    /// * `path` - `/`-separated blob path; each segment is percent-encoded
    pub fn blob_url(&self, path: &str) -> Result<Url> {
        let location = object_path(path)?;

        let mut url = self.container_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("blob endpoint cannot hold paths".into()))?
            .pop_if_empty()
            .extend(location.parts().map(|part| part.as_ref().to_string()));
        Ok(url)
    }

    /// Download a whole blob
    ///
    /// # Returns
    /// The blob bytes, or [`ClientError::NotFound`] if it does not exist
    pub async fn get_blob(&self, path: &str) -> Result<Vec<u8>> {
        let location = object_path(path)?;
        debug!(container = %self.container, %location, "Downloading blob");

        let bytes = self.store.get(&location).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Upload a whole blob, replacing any existing one
    ///
    /// # Returns
    /// The public URL of the uploaded blob
    pub async fn put_blob(&self, path: &str, body: Vec<u8>, content_type: &str) -> Result<Url> {
        let location = object_path(path)?;
        let url = self.blob_url(path)?;
        debug!(container = %self.container, %location, bytes = body.len(), "Uploading blob");

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(body), options)
            .await?;
        Ok(url)
    }
}

/// Validates a blob path; `.` and `..` segments and empty segments are rejected
fn object_path(path: &str) -> Result<Path> {
    if path.is_empty() {
        return Err(ClientError::InvalidRequest("blob path is required".into()));
    }
    Ok(Path::parse(path)?)
}

fn container_url(endpoint: &str, container: &str) -> Result<Url> {
    if container.is_empty() {
        return Err(ClientError::InvalidRequest("container name is required".into()));
    }

    let mut url = Url::parse(endpoint).map_err(|e| {
        ClientError::InvalidConnectionString(format!("invalid blob endpoint '{}': {}", endpoint, e))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            ClientError::InvalidConnectionString(format!(
                "blob endpoint '{}' cannot hold paths",
                endpoint
            ))
        })?
        .pop_if_empty()
        .push(container);
    Ok(url)
}

/// Splits a SAS token into decoded query pairs
fn sas_query_pairs(sas: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(sas.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    const KEY: &str = "Y29zdGNhbGMtdGVzdC1rZXk=";

    fn memory_client() -> (Arc<InMemory>, BlobClient) {
        let store = Arc::new(InMemory::new());
        let url = Url::parse("https://acct.blob.core.windows.net/finops-output").unwrap();
        let client = BlobClient::with_store(store.clone(), "finops-output", url);
        (store, client)
    }

    fn azure_client(connection_string: &str, container: &str) -> Result<BlobClient> {
        let connection: StorageConnection = connection_string.parse()?;
        BlobClient::new(
            &connection,
            container,
            Duration::from_secs(30),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn test_blob_url_encodes_segments() {
        let client = azure_client(
            &format!("AccountName=acct;AccountKey={}", KEY),
            "finops-output",
        )
        .unwrap();

        let url = client.blob_url("Acme Corp/Q1 plan/result.json").unwrap();
        assert_eq!(
            url.as_str(),
            "https://acct.blob.core.windows.net/finops-output/Acme%20Corp/Q1%20plan/result.json"
        );
        assert_eq!(client.container(), "finops-output");
    }

    #[test]
    fn test_blob_url_keeps_endpoint_path() {
        let client = azure_client(
            &format!(
                "AccountName=devstoreaccount1;AccountKey={};BlobEndpoint=http://127.0.0.1:10000/devstoreaccount1",
                KEY
            ),
            "c",
        )
        .unwrap();

        let url = client.blob_url("a/b.json").unwrap();
        assert_eq!(url.path(), "/devstoreaccount1/c/a/b.json");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let (_, client) = memory_client();
        for path in ["../q1/result.json", "./q1/result.json", "acme//result.json", ""] {
            assert!(
                matches!(client.blob_url(path), Err(ClientError::InvalidRequest(_))),
                "{} must be rejected",
                path
            );
        }
    }

    #[test]
    fn test_sas_connection_builds_client() {
        let client = azure_client(
            "AccountName=acct;SharedAccessSignature=sv=2022-11-02&sig=a%2Bb",
            "uploads",
        )
        .unwrap();
        assert_eq!(client.container(), "uploads");
        assert_eq!(
            sas_query_pairs("sv=2022-11-02&sig=a%2Bb"),
            vec![
                ("sv".to_string(), "2022-11-02".to_string()),
                ("sig".to_string(), "a+b".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_container_is_rejected() {
        let err = azure_client(&format!("AccountName=acct;AccountKey={}", KEY), "").unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let (store, client) = memory_client();

        let url = client
            .put_blob("uploads/pdfs/brief.pdf", b"%PDF-1.7".to_vec(), "application/pdf")
            .await
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://acct.blob.core.windows.net/finops-output/uploads/pdfs/brief.pdf"
        );

        let stored = store
            .get(&Path::from("uploads/pdfs/brief.pdf"))
            .await
            .unwrap();
        let content_type: Option<&str> = stored
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.as_ref());
        assert_eq!(content_type, Some("application/pdf"));

        let bytes = client.get_blob("uploads/pdfs/brief.pdf").await.unwrap();
        assert_eq!(bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_missing_blob_is_not_found() {
        let (_, client) = memory_client();

        let err = client.get_blob("acme/q1/result.json").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
