//! JSONL codec - header line plus one row per line
//!
//! Line 1 holds the column names as a JSON array; every following non-blank
//! line is one row, also as a JSON array. Keeps column order stable and lets
//! large artifacts stream line by line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::codec::{TableCodec, WriteOptions};
use crate::core::table::Table;
use crate::error::CacheError;

pub struct JsonlCodec;

impl TableCodec for JsonlCodec {
    fn extension(&self) -> &'static str {
        "jsonl"
    }

    fn write(&self, table: &Table, path: &Path, _options: &WriteOptions) -> Result<(), CacheError> {
        let file = File::create(path).map_err(|e| CacheError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        let header = serde_json::to_string(table.columns())
            .map_err(|e| CacheError::codec(path, e.to_string()))?;
        writeln!(writer, "{}", header).map_err(|e| CacheError::io(path, e))?;

        for row in table.rows() {
            let line =
                serde_json::to_string(row).map_err(|e| CacheError::codec(path, e.to_string()))?;
            writeln!(writer, "{}", line).map_err(|e| CacheError::io(path, e))?;
        }

        writer.flush().map_err(|e| CacheError::io(path, e))
    }

    fn read(&self, path: &Path) -> Result<Table, CacheError> {
        let file = File::open(path).map_err(|e| CacheError::io(path, e))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line.map_err(|e| CacheError::io(path, e))?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(CacheError::codec(path, "empty jsonl artifact")),
            }
        };

        let columns: Vec<String> = serde_json::from_str(&header)
            .map_err(|e| CacheError::codec(path, format!("bad header line: {e}")))?;
        let mut table = Table::new(columns);

        for line in lines {
            let line = line.map_err(|e| CacheError::io(path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let row: Vec<Value> = serde_json::from_str(&line)
                .map_err(|e| CacheError::codec(path, e.to_string()))?;
            table.push_row(row)?;
        }

        Ok(table)
    }
}
