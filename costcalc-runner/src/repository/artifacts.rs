//! Artifact store
//!
//! Uploads supporting files the remote job reads by URL.

use async_trait::async_trait;
use costcalc_client::BlobClient;

use crate::error::StoreError;

/// Write access to the location artifacts are uploaded to
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Uploads a whole object, replacing any existing one
    ///
    /// # Arguments
    /// * `path` - Object path inside the upload container
    /// * `body` - File contents
    /// * `content_type` - MIME type stored with the object
    ///
    /// # Returns
    /// The URL the remote job can read the object from
    async fn upload(&self, path: &str, body: Vec<u8>, content_type: &str)
    -> Result<String, StoreError>;
}

/// Object store implementation of ArtifactStore
pub struct BlobArtifactStore {
    client: BlobClient,
}

impl BlobArtifactStore {
    /// # Arguments
    /// * `client` - Client for the upload container
    pub fn new(client: BlobClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactStore for BlobArtifactStore {
    async fn upload(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let url = self.client.put_blob(path, body, content_type).await?;
        Ok(url.to_string())
    }
}
