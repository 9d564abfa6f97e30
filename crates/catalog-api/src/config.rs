//! Service configuration parsed from environment variables

use crate::error::{ApiError, Result};
use product_catalog::{CachePolicy, CatalogCacheConfig};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Exports are files under `root/<collection>/`
    Filesystem { root: PathBuf },
    /// Exports are served from an HTTP bucket publishing an index
    Http { base_url: Url },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreBackend,
    pub catalog: CatalogCacheConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Parse configuration from an arbitrary variable source
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&var, "PORT", 3005)?;

        let store = match var("STORE_BACKEND").as_deref().unwrap_or("fs") {
            "fs" => StoreBackend::Filesystem {
                root: var("STORE_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./data")),
            },
            "http" => {
                let raw = var("STORE_URL").ok_or_else(|| {
                    ApiError::Config("STORE_URL is required when STORE_BACKEND=http".to_string())
                })?;
                let base_url = Url::parse(&raw)
                    .map_err(|e| ApiError::Config(format!("STORE_URL {:?}: {}", raw, e)))?;
                StoreBackend::Http { base_url }
            }
            other => {
                return Err(ApiError::Config(format!(
                    "Unknown STORE_BACKEND {:?} (expected \"fs\" or \"http\")",
                    other
                )))
            }
        };

        let defaults = CatalogCacheConfig::default();
        let collection = var("COLLECTION").unwrap_or(defaults.collection);
        if collection.trim().is_empty() {
            return Err(ApiError::Config("COLLECTION must not be empty".to_string()));
        }

        let snapshot_default = defaults.snapshot_policy;
        let products_default = defaults.products_policy;

        let catalog = CatalogCacheConfig {
            collection,
            fetch_timeout: secs_or(&var, "FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            snapshot_policy: CachePolicy::new(
                secs_or(&var, "SNAPSHOT_SLIDING_SECS", snapshot_default.sliding)?,
                secs_or(&var, "SNAPSHOT_ABSOLUTE_SECS", snapshot_default.absolute)?,
            ),
            products_policy: CachePolicy::new(
                secs_or(&var, "PRODUCTS_SLIDING_SECS", products_default.sliding)?,
                secs_or(&var, "PRODUCTS_ABSOLUTE_SECS", products_default.absolute)?,
            ),
        };

        Ok(Self {
            port,
            store,
            catalog,
        })
    }
}

fn parse_or<F, T>(var: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ApiError::Config(format!("{} {:?}: {}", name, raw, e))),
        None => Ok(default),
    }
}

fn secs_or<F>(var: &F, name: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = parse_or(var, name, default.as_secs())?;
    if secs == 0 {
        return Err(ApiError::Config(format!("{} must be greater than zero", name)));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3005);
        assert_eq!(
            config.store,
            StoreBackend::Filesystem {
                root: PathBuf::from("./data")
            }
        );
        assert_eq!(config.catalog.collection, "scraped-products");
        assert_eq!(config.catalog.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.catalog.snapshot_policy, CachePolicy::snapshot_default());
        assert_eq!(config.catalog.products_policy, CachePolicy::products_default());
    }

    #[test]
    fn test_http_backend() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "http"),
            ("STORE_URL", "https://bucket.example.com/exports"),
            ("COLLECTION", "trodo"),
            ("PRODUCTS_SLIDING_SECS", "5"),
        ]))
        .unwrap();

        match config.store {
            StoreBackend::Http { base_url } => {
                assert_eq!(base_url.host_str(), Some("bucket.example.com"))
            }
            other => panic!("unexpected backend {:?}", other),
        }
        assert_eq!(config.catalog.collection, "trodo");
        assert_eq!(
            config.catalog.products_policy.sliding,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_http_backend_requires_url() {
        let result = Config::from_lookup(lookup(&[("STORE_BACKEND", "http")]));
        assert!(matches!(result, Err(ApiError::Config(msg)) if msg.contains("STORE_URL")));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let result = Config::from_lookup(lookup(&[("STORE_BACKEND", "s3")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FETCH_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SNAPSHOT_ABSOLUTE_SECS", "-1")])).is_err());
    }
}
