//! HTTP bucket backend
//!
//! Expects the bucket to publish `{base}/{collection}/index.json`, a JSON
//! array of [`ObjectInfo`], next to the objects themselves at
//! `{base}/{collection}/{key}`.

use crate::error::{Result, StoreError};
use crate::fs::validate_segment;
use crate::store::ObjectStore;
use crate::types::ObjectInfo;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const INDEX_FILE: &str = "index.json";

pub struct HttpObjectStore {
    client: Client,
    base_url: String,
}

impl HttpObjectStore {
    /// Create a store rooted at `base_url` with a per-request timeout
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &Url, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn index_url(&self, collection: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(collection),
            INDEX_FILE
        )
    }

    fn object_url(&self, collection: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(collection),
            urlencoding::encode(key)
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Object store request failed");
            return Err(StoreError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn list(&self, collection: &str) -> Result<Vec<ObjectInfo>> {
        validate_segment(collection)?;
        let url = self.index_url(collection);
        debug!(url = %url, "Fetching collection index");

        let body = self.get(&url).await?.bytes().await?;
        let objects: Vec<ObjectInfo> = serde_json::from_slice(&body)?;

        debug!(count = objects.len(), "Fetched collection index");
        Ok(objects)
    }

    async fn fetch(&self, collection: &str, key: &str) -> Result<Vec<u8>> {
        validate_segment(collection)?;
        validate_segment(key)?;
        let url = self.object_url(collection, key);
        debug!(url = %url, "Fetching object");

        let data = self.get(&url).await?.bytes().await?.to_vec();

        debug!(size = data.len(), "Fetched object");
        Ok(data)
    }
}
