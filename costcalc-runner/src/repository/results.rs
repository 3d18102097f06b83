//! Result store
//!
//! Reads result documents written by the remote job.

use async_trait::async_trait;
use costcalc_client::BlobClient;

use crate::error::StoreError;

/// Read access to the location result documents are written to
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Reads a whole object
    ///
    /// # Arguments
    /// * `path` - Object path inside the result container
    async fn read(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Human readable location of `path`, for logs and errors
    fn location(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Object store implementation of ResultStore
pub struct BlobResultStore {
    client: BlobClient,
}

impl BlobResultStore {
    /// # Arguments
    /// * `client` - Client for the container the remote job writes results to
    pub fn new(client: BlobClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResultStore for BlobResultStore {
    async fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        Ok(self.client.get_blob(path).await?)
    }

    fn location(&self, path: &str) -> String {
        format!("{}/{}", self.client.container(), path)
    }
}
