//! Cache module - entry description, freshness, and resolution
//!
//! Provides:
//! - `CachedQuery` entry descriptors and artifact path derivation
//! - TTL freshness evaluation against artifact mtimes
//! - Single-entry and batched cache-or-fetch resolution

pub mod batch;
pub mod entry;
pub mod freshness;
pub mod resolver;
