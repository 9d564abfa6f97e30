//! Object store gateway
//!
//! Lists the objects stored in a named collection and fetches their bodies.
//! The catalog only depends on the [`ObjectStore`] trait; the backends here
//! cover a local export directory, an HTTP bucket that publishes a JSON index,
//! and an in-process store.

pub mod error;
pub mod fs;
pub mod http;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use fs::FsObjectStore;
pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;
pub use store::ObjectStore;
pub use types::ObjectInfo;
