//! Error types for the catalog API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use product_catalog::CatalogError;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    Config(String),
    Io(Box<std::io::Error>),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Catalog(err) => write!(f, "{}", err),
            ApiError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ApiError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Catalog(err) => Some(err),
            ApiError::Io(err) => Some(err.as_ref()),
            ApiError::Config(_) => None,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(Box::new(err))
    }
}

impl From<object_store_gateway::StoreError> for ApiError {
    fn from(err: object_store_gateway::StoreError) -> Self {
        ApiError::Catalog(CatalogError::Store(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ApiError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ApiError::Config(err.to_string())
    }
}

/// Every failure is scoped to the request and reported as a 500 with a
/// plain-text message. Store failures keep their own prefix.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        let message = match &self {
            ApiError::Catalog(err @ CatalogError::Store(_)) => err.to_string(),
            other => format!("An error occurred: {}", other),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
