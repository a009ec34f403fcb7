//! # sf-extract-query
//!
//! SOQL query execution and result materialization: the core of the
//! extraction pipeline.
//!
//! The pipeline is a single-threaded pull chain:
//!
//! ```text
//! caller → Extractor → bind → QueryStream → RowProjector → rows
//!                                                        ↘ CsvSink → file
//! ```
//!
//! - [`bind`] substitutes positional `%s` parameters with checked arity
//! - [`QueryStream`] lazily follows the API's continuation cursors, one
//!   batch in memory at a time
//! - [`RowProjector`] flattens nested records onto a column schema fixed
//!   by the first record (relationship fields become dotted columns)
//! - [`CsvSink`] writes header and rows as UTF-8, LF-terminated CSV
//! - [`Extractor`] composes the above into `query` (lazy rows) and
//!   `export` (completed file path)
//!
//! Nothing here retries or caches: each invocation is a fresh cursor
//! chain, and every failure propagates immediately so the host
//! orchestrator's task layer can apply its own policy.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_extract_client::SalesforceClient;
//! use sf_extract_query::Extractor;
//!
//! let client = SalesforceClient::new(instance_url, access_token)?;
//! let extractor = Extractor::new(client);
//!
//! let path = extractor
//!     .export(
//!         "SELECT Id, Name FROM Account WHERE SystemModstamp >= %s",
//!         &["2020-01-01T00:00:00Z".to_string()],
//!         "/tmp/accounts.csv",
//!         true,
//!     )
//!     .await?;
//! ```

mod bind;
mod error;
mod facade;
mod project;
mod sink;
mod stream;

pub use bind::bind;
pub use error::{Error, ErrorKind, Result};
pub use facade::{Extractor, RowStream};
pub use project::{Row, RowProjector};
pub use sink::{write_all, CsvSink};
pub use stream::QueryStream;
