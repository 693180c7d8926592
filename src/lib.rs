//! Disk-backed memoization for SQL query results.
//!
//! A query is described declaratively as a [`CachedQuery`]: its SQL text, an
//! executor closure that runs it against a live data source, a target
//! directory, and a serialization format. [`resolve`] checks whether a
//! previously persisted artifact is still fresh under a [`LivenessRule`];
//! if so the artifact is deserialized from disk, otherwise the executor runs
//! and the result is persisted before being returned. [`resolve_all`] fans a
//! batch of entries out concurrently and concatenates the results into one
//! table, preserving entry order.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::Duration;
//! use serde_json::json;
//! use sqlmemo::{resolve, CachedQuery, Executor, LivenessRule, Table};
//!
//! # fn main() -> Result<(), sqlmemo::CacheError> {
//! let executor: Executor = Arc::new(|sql| {
//!     // run `sql` against a real connection here
//!     Ok(Table::from_rows(["n"], vec![vec![json!(1)]])?)
//! });
//!
//! let query = CachedQuery::new("SELECT 1", executor, "./cache", "jsonl")?;
//!
//! // Served from disk for a week, re-fetched afterwards
//! let table = resolve(&query, &LivenessRule::MaxAge(Duration::days(7)), false)?;
//! assert_eq!(table.n_rows(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Reliability against flaky sources comes from splitting one large query
//! into several independently cacheable entries, not from retry loops: no
//! operation here retries internally, and a fetch failure never falls back
//! to stale cache data.

pub mod cache;
pub mod codec;
pub mod core;
pub mod diag;
pub mod error;

pub use crate::cache::batch::{resolve_all, BatchOptions, ExecStrategy};
pub use crate::cache::entry::{CachedQuery, Executor};
pub use crate::cache::freshness::{is_expired, LivenessRule};
pub use crate::cache::resolver::resolve;
pub use crate::codec::{formats, lookup_codec, register_codec, TableCodec, WriteOptions};
pub use crate::core::table::Table;
pub use crate::core::util::HashAlgorithm;
pub use crate::error::{BatchFailure, CacheError, ExecutorError};
