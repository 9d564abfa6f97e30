//! Response types for the catalog API

use product_catalog::CacheStats;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub collection: String,
    pub cache: CacheStats,
}
