//! Core HTTP client with pooling, compression, and Salesforce-specific handling.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::response::Response;

/// HTTP client for the Salesforce REST API.
///
/// Failures are surfaced immediately: no request is ever retried here.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent);

        if config.accept_compressed {
            builder = builder.gzip(true).deflate(true);
        } else {
            builder = builder.gzip(false).deflate(false);
        }

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue an authenticated GET request.
    ///
    /// Rate limiting (429) and Salesforce error bodies are mapped to the
    /// corresponding error kinds before the response is returned.
    #[instrument(skip(self, bearer_token), fields(url = %url))]
    pub async fn get(&self, url: &str, bearer_token: &str) -> Result<Response> {
        let req = self.inner.get(url).bearer_auth(bearer_token);

        if self.config.enable_tracing {
            debug!("Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        if response.status().as_u16() == 429 {
            let retry_after = Response::new(response).retry_after();
            return Err(Error::new(ErrorKind::RateLimited { retry_after }));
        }

        Response::new(response).check_salesforce_error().await
    }

    /// Issue an authenticated GET request and deserialize the JSON response.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> Result<T> {
        let response = self.get(url, bearer_token).await?;
        response.json().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = SfHttpClient::default_client().unwrap();
        assert!(client.config().accept_compressed);
    }

    #[tokio::test]
    async fn test_successful_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let response = client
            .get(&format!("{}/test", mock_server.uri()), "test-token")
            .await
            .unwrap();

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_salesforce_error_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!([{
                "errorCode": "MALFORMED_QUERY",
                "message": "unexpected token: 'FORM'",
                "fields": []
            }])))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let result = client
            .get(&format!("{}/error", mock_server.uri()), "token")
            .await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SalesforceApi { .. }));
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/secure"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Session expired or invalid"))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let err = client
            .get(&format!("{}/secure", mock_server.uri()), "stale-token")
            .await
            .unwrap_err();

        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_rate_limiting_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/limited"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let err = client
            .get(&format!("{}/limited", mock_server.uri()), "token")
            .await
            .unwrap_err();

        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(30)));
    }
}
