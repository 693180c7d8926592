//! JSON codec - whole-table document
//!
//! Serializes the entire table as one JSON object. Pretty-printed by
//! default; the `compact` subformat writes a single line.

use std::fs;
use std::path::Path;

use crate::codec::{TableCodec, WriteOptions};
use crate::core::table::Table;
use crate::error::CacheError;

pub struct JsonCodec;

impl TableCodec for JsonCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, table: &Table, path: &Path, options: &WriteOptions) -> Result<(), CacheError> {
        let payload = match options.subformat.as_deref() {
            Some("compact") => serde_json::to_string(table),
            _ => serde_json::to_string_pretty(table),
        }
        .map_err(|e| CacheError::codec(path, e.to_string()))?;

        fs::write(path, payload).map_err(|e| CacheError::io(path, e))
    }

    fn read(&self, path: &Path) -> Result<Table, CacheError> {
        let content = fs::read_to_string(path).map_err(|e| CacheError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| CacheError::codec(path, e.to_string()))
    }
}
