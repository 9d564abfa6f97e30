//! Error types for the product catalog

use object_store_gateway::StoreError;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum CatalogError {
    /// The object store could not be listed or read
    Store(StoreError),
    /// The collection holds no objects
    NotFound(String),
    /// A store call did not finish within the fetch timeout
    Timeout(Duration),
    Io(Box<std::io::Error>),
    /// A single export line that could not be parsed. Only logged; the
    /// record is dropped and parsing continues.
    MalformedRecord { line: usize, message: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Store(err) => write!(f, "Object store error: {}", err),
            CatalogError::NotFound(collection) => {
                write!(f, "No objects found in collection {}", collection)
            }
            CatalogError::Timeout(limit) => {
                write!(f, "Object store did not respond within {:?}", limit)
            }
            CatalogError::Io(err) => write!(f, "IO error: {}", err),
            CatalogError::MalformedRecord { line, message } => {
                write!(f, "Malformed record on line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Store(err) => Some(err),
            CatalogError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::Store(err)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
