//! The object store capability consumed by the catalog

use crate::error::Result;
use crate::types::ObjectInfo;
use async_trait::async_trait;

/// Read-only access to a blob store organised in named collections.
///
/// `fetch` returns the whole body; implementations must not hand back a
/// partially read object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object in `collection`, in whatever order the store reports them
    async fn list(&self, collection: &str) -> Result<Vec<ObjectInfo>>;

    /// Fetch the body of a single object
    async fn fetch(&self, collection: &str, key: &str) -> Result<Vec<u8>>;
}
