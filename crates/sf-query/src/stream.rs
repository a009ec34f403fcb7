//! Lazy, pull-based iteration over paginated query results.

use sf_extract_client::{QueryResult, SalesforceClient};
use tracing::{debug, instrument};

use crate::error::Result;

/// Where the stream is in the continuation chain.
#[derive(Debug)]
enum Cursor {
    /// The initial query has not been issued yet.
    Start,
    /// Continuation URL for the next page.
    Next(String),
    /// The API reported completion.
    Done,
}

/// A lazy sequence of result batches for one query execution.
///
/// Each call to [`next_batch`](Self::next_batch) performs exactly one API
/// request, so memory stays bounded to a single batch and no page is
/// fetched before the consumer asks for it. The sequence is finite and
/// not restartable: replaying a query means constructing a new stream.
/// Failures surface immediately; nothing is retried here.
#[derive(Debug)]
pub struct QueryStream {
    client: SalesforceClient,
    soql: String,
    include_deleted: bool,
    cursor: Cursor,
    pages_fetched: u32,
}

impl QueryStream {
    /// Create a stream for the given bound query.
    ///
    /// No network interaction happens until the first `next_batch` call.
    pub fn new(client: SalesforceClient, soql: impl Into<String>) -> Self {
        Self {
            client,
            soql: soql.into(),
            include_deleted: false,
            cursor: Cursor::Start,
            pages_fetched: 0,
        }
    }

    /// Query through the QueryAll endpoint so deleted and archived
    /// records are included.
    pub fn include_deleted(mut self, include: bool) -> Self {
        self.include_deleted = include;
        self
    }

    /// Returns true once the API has reported completion.
    pub fn is_done(&self) -> bool {
        matches!(self.cursor, Cursor::Done)
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Fetch the next batch, or `None` once the result set is exhausted.
    #[instrument(skip(self), fields(page = self.pages_fetched + 1))]
    pub async fn next_batch(&mut self) -> Result<Option<QueryResult>> {
        let result: QueryResult = match &self.cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => {
                if self.include_deleted {
                    self.client.query_including_deleted(&self.soql).await?
                } else {
                    self.client.query(&self.soql).await?
                }
            }
            Cursor::Next(url) => self.client.query_more(url).await?,
        };

        self.pages_fetched += 1;
        debug!(
            records = result.records.len(),
            total_size = result.total_size,
            done = result.done,
            "fetched result batch"
        );

        // A missing continuation URL ends the chain even if the done flag
        // was omitted.
        self.cursor = match &result.next_records_url {
            Some(url) if !result.done => Cursor::Next(url.clone()),
            _ => Cursor::Done,
        };

        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> SalesforceClient {
        SalesforceClient::new(server.uri(), "test-token").unwrap()
    }

    #[tokio::test]
    async fn test_two_batches_two_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/query"))
            .and(query_param("q", "SELECT Id FROM Account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 3,
                "done": false,
                "nextRecordsUrl": "/services/data/v62.0/query/01g-2000",
                "records": [{"Id": "001"}, {"Id": "002"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/query/01g-2000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 3,
                "done": true,
                "records": [{"Id": "003"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut stream = QueryStream::new(client_for(&mock_server).await, "SELECT Id FROM Account");

        let first = stream.next_batch().await.unwrap().unwrap();
        assert_eq!(first.records.len(), 2);
        assert!(!first.done);
        assert!(!stream.is_done());

        let second = stream.next_batch().await.unwrap().unwrap();
        assert_eq!(second.records.len(), 1);
        assert!(second.done);
        assert!(stream.is_done());

        assert!(stream.next_batch().await.unwrap().is_none());
        assert_eq!(stream.pages_fetched(), 2);
    }

    #[tokio::test]
    async fn test_lazy_no_request_before_first_pull() {
        let mock_server = MockServer::start().await;
        // No mocks mounted: constructing the stream must not hit the server.
        let _stream = QueryStream::new(client_for(&mock_server).await, "SELECT Id FROM Account");
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_include_deleted_uses_query_all_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/queryAll"))
            .and(query_param("q", "SELECT Id FROM Account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 0,
                "done": true,
                "records": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut stream = QueryStream::new(client_for(&mock_server).await, "SELECT Id FROM Account")
            .include_deleted(true);

        let batch = stream.next_batch().await.unwrap().unwrap();
        assert!(batch.records.is_empty());
        assert!(stream.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_cursor_terminates_chain() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 1,
                "done": false,
                "records": [{"Id": "001"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut stream = QueryStream::new(client_for(&mock_server).await, "SELECT Id FROM Account");
        assert!(stream.next_batch().await.unwrap().is_some());
        assert!(stream.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_api_error_surfaces_without_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/query"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Session expired or invalid"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut stream = QueryStream::new(client_for(&mock_server).await, "SELECT Id FROM Account");
        let err = stream.next_batch().await.unwrap_err();
        assert!(matches!(err.kind, crate::ErrorKind::Query(_)));
    }
}
