//! Export snapshots and selection of the freshest one

use crate::error::{CatalogError, Result};
use chrono::{DateTime, Utc};
use object_store_gateway::ObjectInfo;

/// The body of the most recent export object, as fetched from the store
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub object: ObjectInfo,
    pub body: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

/// Pick the most recently modified object.
///
/// Ties keep the earliest listed object. An empty listing is
/// [`CatalogError::NotFound`].
pub fn select_latest<'a>(collection: &str, objects: &'a [ObjectInfo]) -> Result<&'a ObjectInfo> {
    objects
        .iter()
        .reduce(|latest, candidate| {
            if candidate.last_modified > latest.last_modified {
                candidate
            } else {
                latest
            }
        })
        .ok_or_else(|| CatalogError::NotFound(collection.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn object(key: &str, hour: u32) -> ObjectInfo {
        ObjectInfo::new(key, Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_selects_maximum_last_modified() {
        let objects = vec![object("a", 3), object("b", 9), object("c", 5)];
        let latest = select_latest("exports", &objects).unwrap();
        assert_eq!(latest.key, "b");
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let objects = vec![object("a", 1), object("b", 7), object("c", 7)];
        let latest = select_latest("exports", &objects).unwrap();
        assert_eq!(latest.key, "b");
    }

    #[test]
    fn test_single_object() {
        let objects = vec![object("only", 0)];
        assert_eq!(select_latest("exports", &objects).unwrap().key, "only");
    }

    #[test]
    fn test_empty_listing_is_not_found() {
        let result = select_latest("exports", &[]);
        assert!(matches!(result, Err(CatalogError::NotFound(c)) if c == "exports"));
    }
}
