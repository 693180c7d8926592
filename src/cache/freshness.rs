//! Freshness evaluation - decides whether an on-disk artifact is still usable
//!
//! The artifact's filesystem mtime is the sole freshness signal; no manifest
//! or index file is consulted. A missing artifact is always expired, which is
//! the designed "always fetch" path rather than an error.

use chrono::{DateTime, Duration, Utc};

use crate::cache::entry::CachedQuery;
use crate::core::util::mtime;
use crate::error::CacheError;

/// Policy determining how long a cached artifact stays usable.
///
/// `now` is read fresh on every evaluation; nothing is cached between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessRule {
    /// Fresh iff the artifact's mtime is at or after this instant.
    /// `ExpiresAt(Utc::now())` therefore always forces a fetch.
    ExpiresAt(DateTime<Utc>),

    /// Fresh iff the artifact is younger than this duration
    MaxAge(Duration),
}

/// Check whether the entry's artifact is expired under `rule`.
///
/// Pure read; safe to call repeatedly and concurrently. Filesystem errors
/// other than not-found propagate.
pub fn is_expired(entry: &CachedQuery, rule: &LivenessRule) -> Result<bool, CacheError> {
    let path = entry.artifact_path();

    let modified = match mtime(&path) {
        Ok(modified) => modified,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(CacheError::io(path, e)),
    };

    let expired = match rule {
        LivenessRule::ExpiresAt(expires) => modified < *expires,
        LivenessRule::MaxAge(ttl) => Utc::now() - modified >= *ttl,
    };

    Ok(expired)
}
