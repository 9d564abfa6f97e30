//! In-process object store
//!
//! Holds objects in memory and counts the calls made against it, which makes
//! it convenient for exercising callers that cache store results.

use crate::error::{Result, StoreError};
use crate::store::ObjectStore;
use crate::types::ObjectInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredObject {
    info: ObjectInfo,
    body: Vec<u8>,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    collections: RwLock<HashMap<String, Vec<StoredObject>>>,
    list_calls: AtomicU64,
    fetch_calls: AtomicU64,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `body` under `key`, replacing any object with the same key
    pub async fn put(
        &self,
        collection: &str,
        key: &str,
        last_modified: DateTime<Utc>,
        body: impl Into<Vec<u8>>,
    ) {
        let body = body.into();
        let info = ObjectInfo {
            key: key.to_string(),
            last_modified,
            size: Some(body.len() as u64),
        };

        let mut collections = self.collections.write().await;
        let objects = collections.entry(collection.to_string()).or_default();
        objects.retain(|o| o.info.key != key);
        objects.push(StoredObject { info, body });
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::Relaxed)
    }

    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list(&self, collection: &str) -> Result<Vec<ObjectInfo>> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|objects| objects.iter().map(|o| o.info.clone()).collect())
            .unwrap_or_default())
    }

    async fn fetch(&self, collection: &str, key: &str) -> Result<Vec<u8>> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);

        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|objects| objects.iter().find(|o| o.info.key == key))
            .map(|o| o.body.clone())
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })
    }
}
