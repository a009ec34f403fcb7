//! # sf-extract
//!
//! Salesforce SOQL extraction to delimited files.
//!
//! This crate re-exports the two workspace crates:
//!
//! - **sf-extract-client** — HTTP transport toward the Salesforce REST
//!   API: configuration, error taxonomy, credential resolution
//! - **sf-extract-query** — the extraction pipeline: parameter binding,
//!   paginated query execution, row projection, CSV export
//!
//! A companion binary (`sf-extract`) wraps the pipeline as a task an
//! orchestrator can schedule; any pipeline error exits nonzero so the
//! host's task-failure handling takes over.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sf_extract::client::{Credentials, SalesforceClient, SalesforceCredentials};
//! use sf_extract::query::Extractor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = SalesforceCredentials::from_env()?;
//!     let client = SalesforceClient::new(creds.instance_url(), creds.access_token())?
//!         .with_api_version(creds.api_version());
//!
//!     let path = Extractor::new(client)
//!         .export(
//!             "SELECT Id, Name FROM Account WHERE SystemModstamp >= %s",
//!             &["2020-01-01T00:00:00Z".to_string()],
//!             "/tmp/accounts.csv",
//!             true,
//!         )
//!         .await?;
//!
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```

pub use sf_extract_client as client;
pub use sf_extract_query as query;
