//! Diagnostics hook
//!
//! When a resolution runs with `noisy = true`, one human-readable line is
//! written to stderr saying where the data came from: `"cache <path>"` on a
//! hit, `"server <sql snippet>"` on a fetch. Purely advisory; never parsed
//! back and never affects control flow.

use std::fmt;

use crate::core::util::truncate_string;

/// Max bytes of SQL shown in a diagnostic line
const SNIPPET_BYTES: usize = 48;

/// Where a resolved table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Server,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Cache => write!(f, "cache"),
            Source::Server => write!(f, "server"),
        }
    }
}

/// Produce the identifier snippet for a SQL string
pub fn sql_snippet(sql: &str) -> String {
    let (mut snippet, truncated) = truncate_string(sql, SNIPPET_BYTES);
    if truncated {
        snippet.push_str("...");
    }
    snippet
}

/// Emit one diagnostic line to stderr
pub fn report(source: Source, detail: &str) {
    eprintln!("{} {}", source, detail);
}
