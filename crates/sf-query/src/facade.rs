//! Top-level entry points: lazy row queries and file exports.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use sf_extract_client::SalesforceClient;
use serde_json::Value;
use tracing::{info, instrument};

use crate::bind::bind;
use crate::error::Result;
use crate::project::{Row, RowProjector};
use crate::sink::CsvSink;
use crate::stream::QueryStream;

/// Executes SOQL templates against one Salesforce connection and delivers
/// the results as rows or as a CSV file.
///
/// Every call runs a fresh pipeline: bind parameters, page through the
/// result set, project records onto the column schema. There is no
/// caching across calls and no retrying; errors propagate to the caller,
/// whose task layer owns retry policy.
#[derive(Debug, Clone)]
pub struct Extractor {
    client: SalesforceClient,
    include_deleted: bool,
}

impl Extractor {
    /// Create an extractor over the given client.
    ///
    /// Deleted and archived records are included by default, matching the
    /// QueryAll semantics the export pipeline has always used.
    pub fn new(client: SalesforceClient) -> Self {
        Self {
            client,
            include_deleted: true,
        }
    }

    /// Include or exclude deleted/archived records.
    pub fn include_deleted(mut self, include: bool) -> Self {
        self.include_deleted = include;
        self
    }

    /// Bind `params` into `template` and return a lazy row stream.
    ///
    /// When `include_headers` is true the column names are yielded as the
    /// first row. Binding failures surface here, before any network call;
    /// the first request happens on the first [`RowStream::next_row`].
    pub fn query(
        &self,
        template: &str,
        params: &[String],
        include_headers: bool,
    ) -> Result<RowStream> {
        let soql = bind(template, params)?;
        info!(soql = %soql, "executing query");

        let stream =
            QueryStream::new(self.client.clone(), soql).include_deleted(self.include_deleted);

        Ok(RowStream {
            stream,
            projector: RowProjector::new(),
            buffered: VecDeque::new(),
            header_pending: include_headers,
            exhausted: false,
        })
    }

    /// Run the same pipeline as [`query`](Self::query), terminated by a
    /// CSV sink at `path`. Returns the destination path on success.
    ///
    /// The destination file is created only after the first API request
    /// succeeds, so a query rejected up front never leaves a file behind.
    /// A failure after that point leaves the partial file on disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn export(
        &self,
        template: &str,
        params: &[String],
        path: impl AsRef<Path>,
        include_headers: bool,
    ) -> Result<PathBuf> {
        let path = path.as_ref();
        let soql = bind(template, params)?;
        info!(soql = %soql, "exporting query results");

        let mut stream =
            QueryStream::new(self.client.clone(), soql).include_deleted(self.include_deleted);
        let mut projector = RowProjector::new();
        let mut sink: Option<CsvSink> = None;

        while let Some(batch) = stream.next_batch().await? {
            let rows = projector.project_batch(&batch.records);

            if sink.is_none() {
                match projector.schema() {
                    Some(schema) => {
                        sink = Some(CsvSink::create(path, schema, include_headers)?);
                    }
                    // No records yet; the schema may still arrive with a
                    // later batch.
                    None => continue,
                }
            }

            if let Some(sink) = sink.as_mut() {
                for row in &rows {
                    sink.write_row(row)?;
                }
            }
        }

        // Empty result set: the query succeeded, so the file still gets
        // created, but with no schema there is nothing to write (not even
        // a header).
        let sink = match sink {
            Some(sink) => sink,
            None => CsvSink::create(path, &[], false)?,
        };

        let rows_written = sink.rows_written();
        let path = sink.finish()?;
        info!(rows = rows_written, "export complete");
        Ok(path)
    }
}

/// Lazy sequence of projected rows for one query execution.
///
/// Rows are pulled on demand; a new batch is fetched only once the
/// previous batch's rows have been consumed, so memory stays bounded to
/// one batch. Dropping the stream early simply stops further requests.
#[derive(Debug)]
pub struct RowStream {
    stream: QueryStream,
    projector: RowProjector,
    buffered: VecDeque<Row>,
    header_pending: bool,
    exhausted: bool,
}

impl RowStream {
    /// The column schema, available once the first batch has been fetched.
    pub fn schema(&self) -> Option<&[String]> {
        self.projector.schema()
    }

    /// Pull the next row, fetching the next batch when the current one is
    /// spent. Returns `None` once the result set is exhausted.
    ///
    /// With headers enabled the first returned row holds the column names.
    pub async fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            if self.header_pending {
                if let Some(schema) = self.projector.schema() {
                    let header = schema.iter().map(|c| Value::String(c.clone())).collect();
                    self.header_pending = false;
                    return Ok(Some(header));
                }
            }

            if let Some(row) = self.buffered.pop_front() {
                return Ok(Some(row));
            }

            if self.exhausted {
                return Ok(None);
            }

            match self.stream.next_batch().await? {
                Some(batch) => {
                    self.buffered
                        .extend(self.projector.project_batch(&batch.records));
                }
                None => self.exhausted = true,
            }
        }
    }

    /// Drain the stream into memory. Intended for small result sets and
    /// tests; prefer pulling rows for anything sizable.
    pub async fn collect_rows(mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}
