//! Error types for the object store gateway

use std::fmt;

/// Transport-level failures talking to an object store.
///
/// Every variant means the store could not be reached or did not answer
/// sensibly; callers surface these rather than retrying.
#[derive(Debug)]
pub enum StoreError {
    Http(Box<reqwest::Error>),
    Io(Box<std::io::Error>),
    /// The store answered with a non-success status code
    Status { status: u16, url: String },
    /// Object key that cannot be mapped onto the backend safely
    InvalidKey(String),
    /// No object under this key in the collection
    NotFound { collection: String, key: String },
    /// The collection index could not be decoded
    InvalidIndex(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Http(err) => write!(f, "HTTP error: {}", err),
            StoreError::Io(err) => write!(f, "IO error: {}", err),
            StoreError::Status { status, url } => {
                write!(f, "Store returned status {} for {}", status, url)
            }
            StoreError::InvalidKey(key) => write!(f, "Invalid object key: {}", key),
            StoreError::NotFound { collection, key } => {
                write!(f, "Object {} not found in collection {}", key, collection)
            }
            StoreError::InvalidIndex(msg) => write!(f, "Invalid collection index: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Http(err) => Some(err.as_ref()),
            StoreError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Http(Box::new(err))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(Box::new(err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidIndex(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
