//! Single-entry resolver - the cache-or-fetch state machine

use std::fs;

use crate::cache::entry::CachedQuery;
use crate::cache::freshness::{is_expired, LivenessRule};
use crate::core::table::Table;
use crate::diag::{report, Source};
use crate::error::CacheError;

/// Resolve one entry: serve the artifact if it is still fresh under `rule`,
/// otherwise execute the query, persist the result, and return it.
///
/// One disk read on a hit, one executor call plus one disk write on a miss,
/// no internal retries. A fresh artifact that fails to deserialize is a hard
/// `Codec` error, never silently demoted to a miss. With `noisy`, one line
/// goes to stderr naming the source (`cache <path>` or `server <snippet>`).
///
/// There is no per-key lock: two callers racing on the same cold key may
/// both fetch and both write, last writer wins.
pub fn resolve(
    entry: &CachedQuery,
    rule: &LivenessRule,
    noisy: bool,
) -> Result<Table, CacheError> {
    let path = entry.artifact_path();

    if !is_expired(entry, rule)? {
        let table = entry.codec().read(&path)?;
        if noisy {
            report(Source::Cache, &path.display().to_string());
        }
        return Ok(table);
    }

    let table = entry.execute()?;
    if noisy {
        report(Source::Server, &entry.snippet());
    }

    fs::create_dir_all(entry.directory())
        .map_err(|e| CacheError::io(entry.directory(), e))?;
    entry.codec().write(&table, &path, entry.write_options())?;

    Ok(table)
}
