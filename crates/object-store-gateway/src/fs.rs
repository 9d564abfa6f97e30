//! Filesystem-backed object store
//!
//! Each collection is a directory under the store root and each regular file
//! in it is an object. File modification times stand in for the store's
//! last-modified timestamps.

use crate::error::{Result, StoreError};
use crate::store::ObjectStore;
use crate::types::ObjectInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        validate_segment(collection)?;
        Ok(self.root.join(collection))
    }
}

/// Reject names that would escape the collection directory
pub(crate) fn validate_segment(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(StoreError::InvalidKey(name.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn list(&self, collection: &str) -> Result<Vec<ObjectInfo>> {
        let dir = self.collection_dir(collection)?;
        debug!(dir = %dir.display(), "Listing collection directory");

        let mut objects = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let key = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    warn!(file = ?name, "Skipping object with non UTF-8 name");
                    continue;
                }
            };
            if key.starts_with('.') {
                continue;
            }

            let last_modified: DateTime<Utc> = metadata.modified()?.into();
            objects.push(ObjectInfo {
                key,
                last_modified,
                size: Some(metadata.len()),
            });
        }

        Ok(objects)
    }

    async fn fetch(&self, collection: &str, key: &str) -> Result<Vec<u8>> {
        validate_segment(key)?;
        let path = self.collection_dir(collection)?.join(key);
        debug!(path = %path.display(), "Reading object");

        match tokio::fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}
