//! High-level Salesforce client with typed query methods.
//!
//! `SalesforceClient` combines an instance URL and access token with the
//! HTTP client and exposes the three calls the extraction pipeline needs:
//! an initial query, an including-deleted query, and cursor continuation.
//!
//! ## Security
//!
//! Access tokens are redacted in Debug output.

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::DEFAULT_API_VERSION;

/// High-level Salesforce REST API client.
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new Salesforce client with the given instance URL and access token.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(instance_url, access_token, ClientConfig::default())
    }

    /// Create a new Salesforce client with custom configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let instance_url = instance_url.into();
        url::Url::parse(&instance_url)?;

        let http = SfHttpClient::new(config)?;
        Ok(Self {
            http,
            instance_url: instance_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        })
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the full URL for a path.
    ///
    /// If the path starts with `/`, it's appended to the instance URL.
    /// Otherwise, it's assumed to be a full URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }

    fn query_url(&self, soql: &str, include_deleted: bool) -> String {
        let endpoint = if include_deleted { "queryAll" } else { "query" };
        format!(
            "{}/services/data/v{}/{}?q={}",
            self.instance_url,
            self.api_version,
            endpoint,
            urlencoding::encode(soql)
        )
    }

    /// Execute a SOQL query.
    ///
    /// Returns the first page of results; follow `next_records_url` with
    /// [`query_more`](Self::query_more) while `done` is false.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        self.http
            .get_json(&self.query_url(soql, false), &self.access_token)
            .await
    }

    /// Execute a SOQL query including deleted and archived records (QueryAll endpoint).
    #[instrument(skip(self))]
    pub async fn query_including_deleted<T: DeserializeOwned>(
        &self,
        soql: &str,
    ) -> Result<QueryResult<T>> {
        self.http
            .get_json(&self.query_url(soql, true), &self.access_token)
            .await
    }

    /// Fetch the next page of query results from a continuation cursor.
    ///
    /// `next_records_url` is the instance-relative URL Salesforce returned
    /// alongside the previous page.
    #[instrument(skip(self))]
    pub async fn query_more<T: DeserializeOwned>(
        &self,
        next_records_url: &str,
    ) -> Result<QueryResult<T>> {
        self.http
            .get_json(&self.url(next_records_url), &self.access_token)
            .await
    }
}

/// One page of SOQL query results.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct QueryResult<T = serde_json::Value> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// URL to fetch the next batch of results.
    #[serde(rename = "nextRecordsUrl")]
    pub next_records_url: Option<String>,

    /// The records.
    pub records: Vec<T>,
}
