//! Newline-delimited JSON export parsing

use crate::error::CatalogError;
use crate::product::Product;
use std::io::BufRead;
use tracing::{debug, warn};

/// Products parsed from an export, and how many non-blank lines were dropped
#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub products: Vec<Product>,
    pub skipped: usize,
}

/// Read every line of `reader` and parse each non-blank one as a [`Product`].
///
/// Lines that fail to parse (including invalid UTF-8) are logged and skipped.
/// Only I/O errors from the reader itself abort the batch. The reader is
/// consumed and dropped before returning.
pub fn read_products<R: BufRead>(mut reader: R) -> std::io::Result<ParsedRecords> {
    let mut parsed = ParsedRecords::default();
    let mut line = Vec::new();
    let mut line_number = 0;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        line_number += 1;

        let record = line.trim_ascii();
        if record.is_empty() {
            continue;
        }

        match serde_json::from_slice::<Product>(record) {
            Ok(product) => parsed.products.push(product),
            Err(e) => {
                let err = CatalogError::MalformedRecord {
                    line: line_number,
                    message: e.to_string(),
                };
                warn!(error = %err, "Skipping export line");
                parsed.skipped += 1;
            }
        }
    }

    debug!(
        products = parsed.products.len(),
        skipped = parsed.skipped,
        lines = line_number,
        "Parsed export"
    );
    Ok(parsed)
}
