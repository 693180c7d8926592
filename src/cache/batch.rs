//! Batch combinator - resolve many entries concurrently, merge one table
//!
//! Entries are independent, so batch resolution is embarrassingly parallel.
//! Two strategies are offered: the shared rayon pool for cheap fan-out when
//! executors are safely shareable, and one dedicated thread per entry when a
//! query should be failure-isolated from its neighbors (a panicking executor
//! surfaces as that entry's error instead of tearing the batch down).

use std::thread;

use rayon::prelude::*;

use crate::cache::entry::CachedQuery;
use crate::cache::freshness::LivenessRule;
use crate::cache::resolver::resolve;
use crate::core::table::Table;
use crate::error::{BatchFailure, CacheError};

/// How batch entries are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecStrategy {
    /// Resolve entries on the shared rayon worker pool. Panics inside an
    /// executor propagate to the caller, as anywhere else on the pool.
    #[default]
    SharedPool,

    /// Spawn one dedicated OS thread per entry. Nothing is pooled or shared
    /// between entries, and a panicking executor is captured as that entry's
    /// `WorkerPanic` error.
    Isolated,
}

/// Options for `resolve_all`
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Emit per-entry source diagnostics on stderr
    pub noisy: bool,

    pub strategy: ExecStrategy,

    /// Collect successes instead of failing the whole batch. Failed entries
    /// are reported per-entry on stderr and dropped from the merged table;
    /// if every entry fails the batch still errors. Defaults to off: one
    /// failure fails the batch.
    pub isolate_failures: bool,
}

/// Resolve every entry under the same rule and concatenate the results.
///
/// Rows appear in input-entry order regardless of which resolution finishes
/// first. All tables must share one schema; a column-set mismatch is an
/// error. By default any single failure fails the whole call with a `Batch`
/// error naming the failed entries.
pub fn resolve_all(
    entries: &[CachedQuery],
    rule: &LivenessRule,
    options: &BatchOptions,
) -> Result<Table, CacheError> {
    let results = match options.strategy {
        ExecStrategy::SharedPool => run_shared_pool(entries, rule, options.noisy),
        ExecStrategy::Isolated => run_isolated(entries, rule, options.noisy),
    };

    let total = entries.len();
    let mut tables = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, (entry, result)) in entries.iter().zip(results).enumerate() {
        match result {
            Ok(table) => tables.push(table),
            Err(error) => failures.push(BatchFailure {
                index,
                snippet: entry.snippet(),
                error,
            }),
        }
    }

    if failures.is_empty() {
        return Table::concat(tables);
    }

    if options.isolate_failures && !tables.is_empty() {
        for failure in &failures {
            eprintln!("failed {}", failure);
        }
        return Table::concat(tables);
    }

    Err(CacheError::Batch { total, failures })
}

/// Fan out over the shared rayon pool; result order follows input order
fn run_shared_pool(
    entries: &[CachedQuery],
    rule: &LivenessRule,
    noisy: bool,
) -> Vec<Result<Table, CacheError>> {
    entries
        .par_iter()
        .map(|entry| resolve(entry, rule, noisy))
        .collect()
}

/// One dedicated thread per entry, panics captured per entry
fn run_isolated(
    entries: &[CachedQuery],
    rule: &LivenessRule,
    noisy: bool,
) -> Vec<Result<Table, CacheError>> {
    let handles: Vec<_> = entries
        .iter()
        .map(|entry| {
            let entry = entry.clone();
            let rule = *rule;
            thread::spawn(move || resolve(&entry, &rule, noisy))
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| match handle.join() {
            Ok(result) => result,
            Err(payload) => Err(CacheError::WorkerPanic(panic_message(payload))),
        })
        .collect()
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
