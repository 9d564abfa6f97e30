//! Product catalog
//!
//! Materializes the latest scraped product export from an object store,
//! caches both the raw export and the parsed products, and derives filtered
//! views and a category hierarchy from them.

pub mod cache;
pub mod category;
pub mod error;
pub mod filter;
pub mod product;
pub mod records;
pub mod snapshot;

pub use cache::{CachePolicy, CacheStats, CatalogCache, CatalogCacheConfig, LayerStats};
pub use category::{build_category_tree, category_paths, CategoryNode};
pub use error::{CatalogError, Result};
pub use filter::ProductFilter;
pub use product::{AdditionalProperty, Breadcrumb, Offer, Product, ProductSimplified};
pub use records::{read_products, ParsedRecords};
pub use snapshot::{select_latest, Snapshot};
