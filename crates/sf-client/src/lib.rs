//! # sf-extract-client
//!
//! HTTP client infrastructure for the Salesforce REST query API.
//!
//! This crate provides the transport layer used by `sf-extract-query`:
//! - A pooled, compressing HTTP client (`SfHttpClient`)
//! - A Salesforce-aware client with URL building and typed query calls
//!   (`SalesforceClient`)
//! - Salesforce error-response parsing and message sanitization
//! - Credential resolution from the environment (`SalesforceCredentials`)
//!
//! There is deliberately no retry layer here: the extraction pipeline runs
//! under a workflow orchestrator that owns task-level retry policy, so
//! every transport or API failure surfaces immediately.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Error messages are sanitized before being surfaced
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_extract_client::{SalesforceClient, SalesforceCredentials, Credentials};
//!
//! let creds = SalesforceCredentials::from_env()?;
//! let client = SalesforceClient::new(creds.instance_url(), creds.access_token())?;
//!
//! let page = client.query("SELECT Id, Name FROM Account LIMIT 10").await?;
//! println!("{} records, done={}", page.records.len(), page.done);
//! ```

mod client;
mod config;
mod credentials;
mod error;
mod response;
mod salesforce_client;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use credentials::{Credentials, SalesforceCredentials};
pub use error::{Error, ErrorKind, Result};
pub use response::Response;
pub use salesforce_client::{QueryResult, SalesforceClient};

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sf-extract/", env!("CARGO_PKG_VERSION"));
