//! Cache entry - the immutable description of one cacheable query

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codec::{lookup_codec, TableCodec, WriteOptions};
use crate::core::table::Table;
use crate::core::util::{hash_bytes, HashAlgorithm};
use crate::diag::sql_snippet;
use crate::error::{CacheError, ExecutorError};

/// Caller-supplied capability that runs a query against a live data source.
///
/// A closure rather than a connection object: connection details stay
/// captured inside it, so the cache is decoupled from any specific client.
pub type Executor = Arc<dyn Fn(&str) -> Result<Table, ExecutorError> + Send + Sync>;

/// One cacheable query: SQL text, executor, target directory, format.
///
/// Immutable once built. The tuple `(sql, directory, format)` is the cache
/// identity: it determines the artifact path, so identical entries share one
/// file and entries differing in SQL never collide.
#[derive(Clone)]
pub struct CachedQuery {
    sql: String,
    executor: Executor,
    dir: PathBuf,
    format: String,
    codec: Arc<dyn TableCodec>,
    key_algorithm: HashAlgorithm,
    options: WriteOptions,
}

impl CachedQuery {
    /// Build an entry, resolving `format` against the codec registry.
    ///
    /// Fails early with `UnknownFormat` so the resolver never has to
    /// re-validate the format.
    pub fn new(
        sql: impl Into<String>,
        executor: Executor,
        dir: impl Into<PathBuf>,
        format: impl Into<String>,
    ) -> Result<Self, CacheError> {
        let format = format.into();
        let codec = lookup_codec(&format)?;
        Ok(Self {
            sql: sql.into(),
            executor,
            dir: dir.into(),
            format,
            codec,
            key_algorithm: HashAlgorithm::default(),
            options: WriteOptions::default(),
        })
    }

    /// Select a codec subformat, forwarded verbatim to the writer
    pub fn with_subformat(mut self, subformat: impl Into<String>) -> Self {
        self.options.subformat = Some(subformat.into());
        self
    }

    /// Attach a free-form encoding option, forwarded verbatim to the writer
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.params.insert(key.into(), value);
        self
    }

    /// Select the hash algorithm used for the artifact filename
    pub fn with_key_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.key_algorithm = algorithm;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn codec(&self) -> &Arc<dyn TableCodec> {
        &self.codec
    }

    pub fn write_options(&self) -> &WriteOptions {
        &self.options
    }

    /// Truncated SQL used to identify this entry in diagnostics and errors
    pub fn snippet(&self) -> String {
        sql_snippet(&self.sql)
    }

    /// The on-disk artifact path: `<dir>/<hash(sql)>.<extension>`.
    ///
    /// A pure function of the entry; same SQL, directory and format always
    /// map to the same file.
    pub fn artifact_path(&self) -> PathBuf {
        let key = hash_bytes(self.sql.as_bytes(), self.key_algorithm);
        self.dir
            .join(format!("{}.{}", key, self.codec.extension()))
    }

    /// Run the executor against the live data source
    pub fn execute(&self) -> Result<Table, CacheError> {
        (self.executor)(&self.sql).map_err(|source| CacheError::Executor {
            snippet: self.snippet(),
            source,
        })
    }
}

impl fmt::Debug for CachedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedQuery")
            .field("sql", &self.sql)
            .field("dir", &self.dir)
            .field("format", &self.format)
            .field("key_algorithm", &self.key_algorithm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_executor() -> Executor {
        Arc::new(|_sql| Ok(Table::new(Vec::<String>::new())))
    }

    fn entry(sql: &str, dir: &str, format: &str) -> CachedQuery {
        CachedQuery::new(sql, noop_executor(), dir, format).unwrap()
    }

    #[test]
    fn test_same_identity_same_path() {
        let a = entry("SELECT 1", "/tmp/cache", "json");
        let b = entry("SELECT 1", "/tmp/cache", "json");
        assert_eq!(a.artifact_path(), b.artifact_path());
    }

    #[test]
    fn test_different_sql_different_path() {
        let a = entry("SELECT 1", "/tmp/cache", "json");
        let b = entry("SELECT 2", "/tmp/cache", "json");
        assert_ne!(a.artifact_path(), b.artifact_path());
    }

    #[test]
    fn test_path_uses_format_extension() {
        let a = entry("SELECT 1", "/tmp/cache", "jsonl");
        assert_eq!(
            a.artifact_path().extension().and_then(|e| e.to_str()),
            Some("jsonl")
        );
        assert!(a.artifact_path().starts_with("/tmp/cache"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = CachedQuery::new("SELECT 1", noop_executor(), "/tmp", "feather").unwrap_err();
        assert!(matches!(err, CacheError::UnknownFormat(_)));
    }

    #[test]
    fn test_sha1_key_algorithm() {
        let a = entry("SELECT 1", "/tmp/cache", "json").with_key_algorithm(HashAlgorithm::Sha1);
        let name = a
            .artifact_path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap()
            .to_string();
        assert_eq!(name.len(), 40); // 160-bit hex
    }

    #[test]
    fn test_builder_options_forwarded() {
        let q = entry("SELECT 1", "/tmp", "json")
            .with_subformat("compact")
            .with_param("dictencode", serde_json::json!(true));
        assert_eq!(q.write_options().subformat.as_deref(), Some("compact"));
        assert_eq!(
            q.write_options().params.get("dictencode"),
            Some(&serde_json::json!(true))
        );
    }

    #[test]
    fn test_execute_wraps_error() {
        let failing: Executor = Arc::new(|_| Err("no route to host".into()));
        let q = CachedQuery::new("SELECT 1", failing, "/tmp", "json").unwrap();
        let err = q.execute().unwrap_err();
        assert!(matches!(err, CacheError::Executor { .. }));
        assert!(err.to_string().contains("no route to host"));
    }
}
