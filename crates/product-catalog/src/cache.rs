//! Two-layer catalog cache
//!
//! The raw export and the parsed product set are cached separately, each with
//! a sliding (idle) window and an absolute lifetime. Refetching the export
//! costs a network round trip, reparsing only CPU, so the layers expire
//! independently: the product set can be rebuilt from a still-valid export
//! without touching the store.

use crate::error::{CatalogError, Result};
use crate::product::Product;
use crate::records::read_products;
use crate::snapshot::{select_latest, Snapshot};
use chrono::Utc;
use moka::future::Cache;
use object_store_gateway::ObjectStore;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SNAPSHOT_KEY: &str = "latest-snapshot";
const PRODUCTS_KEY: &str = "latest-snapshot-products";

/// Expiration policy for one cache layer.
///
/// An entry is served only while it is younger than `absolute` and was last
/// read less than `sliding` ago; every hit restarts the sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub sliding: Duration,
    pub absolute: Duration,
}

impl CachePolicy {
    pub const fn new(sliding: Duration, absolute: Duration) -> Self {
        Self { sliding, absolute }
    }

    pub const fn snapshot_default() -> Self {
        Self::new(Duration::from_secs(300), Duration::from_secs(60 * 60))
    }

    pub const fn products_default() -> Self {
        Self::new(Duration::from_secs(60), Duration::from_secs(60 * 60))
    }

    fn build<V>(&self) -> Cache<&'static str, V>
    where
        V: Clone + Send + Sync + 'static,
    {
        Cache::builder()
            .max_capacity(1)
            .time_to_idle(self.sliding)
            .time_to_live(self.absolute)
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct CatalogCacheConfig {
    /// Collection holding the exports
    pub collection: String,
    /// Upper bound for each individual store call
    pub fetch_timeout: Duration,
    pub snapshot_policy: CachePolicy,
    pub products_policy: CachePolicy,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            collection: "scraped-products".to_string(),
            fetch_timeout: Duration::from_secs(30),
            snapshot_policy: CachePolicy::snapshot_default(),
            products_policy: CachePolicy::products_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub snapshot: LayerStats,
    pub products: LayerStats,
    /// Malformed export lines dropped across all parses
    pub skipped_records: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    fn snapshot(&self, entries: u64) -> LayerStats {
        LayerStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cached access to the latest export and its parsed products.
///
/// Concurrent misses may each load the export; nothing deduplicates them.
/// Loading goes through [`CatalogCache::load_snapshot`] and
/// [`CatalogCache::load_products`], so single-flight can be added there with
/// `Cache::try_get_with` without touching callers.
pub struct CatalogCache {
    store: Arc<dyn ObjectStore>,
    config: CatalogCacheConfig,
    snapshots: Cache<&'static str, Arc<Snapshot>>,
    products: Cache<&'static str, Arc<Vec<Product>>>,
    snapshot_counters: Counters,
    product_counters: Counters,
    skipped_records: AtomicU64,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn ObjectStore>, config: CatalogCacheConfig) -> Self {
        let snapshots = config.snapshot_policy.build();
        let products = config.products_policy.build();

        Self {
            store,
            config,
            snapshots,
            products,
            snapshot_counters: Counters::default(),
            product_counters: Counters::default(),
            skipped_records: AtomicU64::new(0),
        }
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// The latest export, from cache when still valid
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.snapshots.get(SNAPSHOT_KEY).await {
            self.snapshot_counters.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %snapshot.object.key, "Snapshot served from cache");
            return Ok(snapshot);
        }
        self.snapshot_counters.misses.fetch_add(1, Ordering::Relaxed);

        let snapshot = Arc::new(self.load_snapshot().await?);
        self.snapshots.insert(SNAPSHOT_KEY, Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// Products of the latest export, from cache when still valid
    pub async fn products(&self) -> Result<Arc<Vec<Product>>> {
        if let Some(products) = self.products.get(PRODUCTS_KEY).await {
            self.product_counters.hits.fetch_add(1, Ordering::Relaxed);
            debug!(count = products.len(), "Products served from cache");
            return Ok(products);
        }
        self.product_counters.misses.fetch_add(1, Ordering::Relaxed);

        let products = Arc::new(self.load_products().await?);
        self.products.insert(PRODUCTS_KEY, Arc::clone(&products)).await;
        Ok(products)
    }

    /// Drop both layers; the next request reloads from the store
    pub async fn invalidate(&self) {
        self.snapshots.invalidate(SNAPSHOT_KEY).await;
        self.products.invalidate(PRODUCTS_KEY).await;
        info!(collection = %self.config.collection, "Catalog cache invalidated");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            snapshot: self.snapshot_counters.snapshot(self.snapshots.entry_count()),
            products: self.product_counters.snapshot(self.products.entry_count()),
            skipped_records: self.skipped_records.load(Ordering::Relaxed),
        }
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        let collection = self.config.collection.as_str();
        info!(collection, "Loading latest export from object store");

        let objects = self.with_timeout(self.store.list(collection)).await?;
        let latest = select_latest(collection, &objects)?.clone();

        let body = self
            .with_timeout(self.store.fetch(collection, &latest.key))
            .await?;

        info!(
            key = %latest.key,
            last_modified = %latest.last_modified,
            size = body.len(),
            "Fetched latest export"
        );

        Ok(Snapshot {
            object: latest,
            body,
            fetched_at: Utc::now(),
        })
    }

    async fn load_products(&self) -> Result<Vec<Product>> {
        let snapshot = self.snapshot().await?;
        let parsed = read_products(snapshot.body.as_slice())?;

        if parsed.skipped > 0 {
            self.skipped_records.fetch_add(parsed.skipped as u64, Ordering::Relaxed);
        }
        info!(
            key = %snapshot.object.key,
            products = parsed.products.len(),
            skipped = parsed.skipped,
            "Parsed export"
        );

        Ok(parsed.products)
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = object_store_gateway::Result<T>>,
    {
        let limit = self.config.fetch_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CatalogError::Timeout(limit)),
        }
    }
}
