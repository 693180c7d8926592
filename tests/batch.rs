//! Batched resolution: ordering, failure policy, strategy parity

use chrono::Duration;
use serde_json::json;
use sqlmemo::{
    resolve_all, BatchOptions, CacheError, CachedQuery, ExecStrategy, Executor, LivenessRule,
    Table,
};
use std::sync::Arc;
use tempfile::tempdir;

fn week() -> LivenessRule {
    LivenessRule::MaxAge(Duration::days(7))
}

/// Executor returning one row, optionally stalling first so its entry
/// finishes after its neighbors
fn row_executor(value: i64, delay_ms: u64) -> Executor {
    Arc::new(move |_sql| {
        if delay_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(delay_ms));
        }
        Ok(Table::from_rows(["n"], vec![vec![json!(value)]]).unwrap())
    })
}

fn merged_values(table: &Table) -> Vec<i64> {
    table
        .rows()
        .iter()
        .map(|r| r[0].as_i64().unwrap())
        .collect()
}

#[test]
fn order_follows_entries_not_completion() {
    // The first entry is the slowest, so completion order is reversed
    let delays = [120u64, 60, 0];

    for strategy in [ExecStrategy::SharedPool, ExecStrategy::Isolated] {
        let dir = tempdir().unwrap();
        let entries: Vec<CachedQuery> = delays
            .iter()
            .enumerate()
            .map(|(i, delay)| {
                CachedQuery::new(
                    format!("SELECT {i}"),
                    row_executor(i as i64, *delay),
                    dir.path(),
                    "jsonl",
                )
                .unwrap()
            })
            .collect();

        let options = BatchOptions {
            strategy,
            ..Default::default()
        };
        let merged = resolve_all(&entries, &week(), &options).unwrap();
        assert_eq!(merged_values(&merged), vec![0, 1, 2], "{strategy:?}");
    }
}

#[test]
fn batch_matches_sequential_concat() {
    let temp = tempdir().unwrap();
    let entries: Vec<CachedQuery> = (0..4)
        .map(|i| {
            CachedQuery::new(
                format!("SELECT {i}"),
                row_executor(i, 0),
                temp.path(),
                "json",
            )
            .unwrap()
        })
        .collect();

    let sequential: Vec<Table> = entries
        .iter()
        .map(|e| sqlmemo::resolve(e, &week(), false).unwrap())
        .collect();
    let expected = Table::concat(sequential).unwrap();

    // Second round is served from the artifacts the first round wrote
    let merged = resolve_all(&entries, &week(), &BatchOptions::default()).unwrap();
    assert_eq!(merged, expected);
}

#[test]
fn one_failure_fails_the_batch() {
    let temp = tempdir().unwrap();
    let failing: Executor = Arc::new(|_| Err("relation does not exist".into()));

    let entries = vec![
        CachedQuery::new("SELECT 0", row_executor(0, 0), temp.path(), "json").unwrap(),
        CachedQuery::new("SELECT broken", failing, temp.path(), "json").unwrap(),
        CachedQuery::new("SELECT 2", row_executor(2, 0), temp.path(), "json").unwrap(),
    ];

    let err = resolve_all(&entries, &week(), &BatchOptions::default()).unwrap_err();
    match err {
        CacheError::Batch { total, failures } => {
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].index, 1);
            assert!(failures[0].snippet.contains("SELECT broken"));
            assert!(matches!(failures[0].error, CacheError::Executor { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_mismatch_across_entries_is_an_error() {
    let temp = tempdir().unwrap();
    let wide: Executor = Arc::new(|_| {
        Ok(Table::from_rows(["a", "b"], vec![vec![json!(1), json!(2)]]).unwrap())
    });

    let entries = vec![
        CachedQuery::new("SELECT 0", row_executor(0, 0), temp.path(), "json").unwrap(),
        CachedQuery::new("SELECT a, b", wide, temp.path(), "json").unwrap(),
    ];

    let err = resolve_all(&entries, &week(), &BatchOptions::default()).unwrap_err();
    assert!(matches!(err, CacheError::SchemaMismatch { .. }));
}

#[test]
fn batch_reuses_existing_artifacts() {
    let temp = tempdir().unwrap();
    let entries: Vec<CachedQuery> = (0..3)
        .map(|i| {
            CachedQuery::new(
                format!("SELECT {i}"),
                row_executor(i, 0),
                temp.path(),
                "jsonl",
            )
            .unwrap()
        })
        .collect();

    let first = resolve_all(&entries, &week(), &BatchOptions::default()).unwrap();

    // Swap in executors that must never run; artifacts satisfy the batch
    let must_not_run: Executor = Arc::new(|sql| panic!("unexpected fetch for {sql}"));
    let cached_entries: Vec<CachedQuery> = (0..3)
        .map(|i| {
            CachedQuery::new(
                format!("SELECT {i}"),
                must_not_run.clone(),
                temp.path(),
                "jsonl",
            )
            .unwrap()
        })
        .collect();

    let second = resolve_all(&cached_entries, &week(), &BatchOptions::default()).unwrap();
    assert_eq!(second, first);
}
