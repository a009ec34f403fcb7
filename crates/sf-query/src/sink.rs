//! Delimited-file sink for projected rows.
//!
//! Output is UTF-8, comma-delimited, LF-terminated CSV. Fields containing
//! the delimiter, a quote, or a newline are double-quoted with embedded
//! quotes doubled (the `csv` crate's RFC 4180 behavior).
//!
//! Writes are not atomic: a failure partway leaves the partial file on
//! disk. Callers needing atomicity should write to a temporary path and
//! rename on success.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::project::Row;

/// Streaming CSV writer owning the destination file for one export.
#[derive(Debug)]
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: u64,
}

impl CsvSink {
    /// Create the destination file, writing the header row if requested.
    ///
    /// An empty schema (an export that produced no records) suppresses the
    /// header even when requested.
    pub fn create(path: impl AsRef<Path>, schema: &[String], include_headers: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| Error::sink(&path, e))?;
        let mut writer = csv::Writer::from_writer(file);

        if include_headers && !schema.is_empty() {
            writer
                .write_record(schema)
                .map_err(|e| Error::sink(&path, e))?;
        }

        debug!(path = %path.display(), "opened export file");
        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    /// Write one row in schema column order.
    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        self.writer
            .write_record(row.iter().map(cell_text))
            .map_err(|e| Error::sink(&self.path, e))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of data rows written so far (excluding the header).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and close the file, returning the destination path.
    pub fn finish(self) -> Result<PathBuf> {
        let Self {
            mut writer, path, ..
        } = self;
        writer.flush().map_err(|e| Error::sink(&path, e))?;
        Ok(path)
    }
}

/// Write a complete result set to `path` in one call.
pub fn write_all<I>(
    schema: &[String],
    rows: I,
    path: impl AsRef<Path>,
    include_headers: bool,
) -> Result<PathBuf>
where
    I: IntoIterator<Item = Row>,
{
    let mut sink = CsvSink::create(path, schema, include_headers)?;
    for row in rows {
        sink.write_row(&row)?;
    }
    sink.finish()
}

/// Stringify a scalar in a stable, locale-independent form.
///
/// Nulls become empty fields; numbers and booleans use their JSON text;
/// anything non-scalar that slips through is serialized compactly.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
