//! Tabular result container
//!
//! Query executors and codecs both speak `Table`: an ordered list of column
//! names plus rows of JSON values. The type is deliberately minimal; it is
//! the merge target for batch resolution and the payload at the codec
//! boundary, not a data-frame library.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CacheError;

/// An ordered, schema-carrying set of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from columns and pre-built rows.
    ///
    /// Fails if any row's arity does not match the column count.
    pub fn from_rows(
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Result<Self, CacheError> {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append one row, checking arity against the column count
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), CacheError> {
        if row.len() != self.columns.len() {
            return Err(CacheError::SchemaMismatch {
                expected: self.columns.clone(),
                found: row.iter().map(|v| v.to_string()).collect(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Concatenate tables in the order given, preserving row order within
    /// each table. All tables must carry the same columns in the same order;
    /// a mismatch is a schema error, never coerced.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Result<Table, CacheError> {
        let mut iter = tables.into_iter();
        let mut merged = match iter.next() {
            Some(first) => first,
            None => return Ok(Table::new(Vec::<String>::new())),
        };

        for table in iter {
            if table.columns != merged.columns {
                return Err(CacheError::SchemaMismatch {
                    expected: merged.columns,
                    found: table.columns,
                });
            }
            merged.rows.extend(table.rows);
        }

        Ok(merged)
    }
}
