//! Codec module - on-disk serialization of tables
//!
//! Formats are a capability lookup, not a hard-coded branch list: codecs are
//! registered by name in a process-wide registry, and `CachedQuery` resolves
//! its format against the registry at construction time. New formats can be
//! added with [`register_codec`] without touching the resolver.

pub mod json;
pub mod jsonl;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::core::table::Table;
use crate::error::CacheError;

/// Writer parameters forwarded verbatim from the cache entry to the codec.
///
/// `subformat` selects a codec-specific variant (the built-in `json` codec
/// accepts `compact`); `params` carries any further free-form options a
/// registered codec cares to interpret. Codecs ignore what they do not know.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub subformat: Option<String>,
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Read/write interface to an on-disk artifact
pub trait TableCodec: Send + Sync {
    /// File extension for artifacts in this format, without the dot
    fn extension(&self) -> &'static str;

    /// Serialize a table to `path`
    fn write(&self, table: &Table, path: &Path, options: &WriteOptions) -> Result<(), CacheError>;

    /// Deserialize a table from `path`
    fn read(&self, path: &Path) -> Result<Table, CacheError>;
}

static REGISTRY: Lazy<RwLock<HashMap<String, Arc<dyn TableCodec>>>> = Lazy::new(|| {
    let mut map: HashMap<String, Arc<dyn TableCodec>> = HashMap::new();
    map.insert("json".to_string(), Arc::new(json::JsonCodec));
    map.insert("jsonl".to_string(), Arc::new(jsonl::JsonlCodec));
    RwLock::new(map)
});

/// Register a codec under a format name, replacing any previous registration
pub fn register_codec(name: impl Into<String>, codec: Arc<dyn TableCodec>) {
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    registry.insert(name.into(), codec);
}

/// Look up the codec registered for a format name
pub fn lookup_codec(name: &str) -> Result<Arc<dyn TableCodec>, CacheError> {
    let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    registry
        .get(name)
        .cloned()
        .ok_or_else(|| CacheError::UnknownFormat(name.to_string()))
}

/// List the registered format names, sorted
pub fn formats() -> Vec<String> {
    let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    let mut names: Vec<String> = registry.keys().cloned().collect();
    names.sort();
    names
}
