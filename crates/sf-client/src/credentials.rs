//! Credentials trait and environment-based resolution.
//!
//! OAuth and JWT token acquisition are out of scope for this crate: the
//! host resolves a connection identifier to an instance URL and a live
//! session token, and hands those in (typically via the environment).
//! All credential types implement custom Debug to redact sensitive data.

use crate::error::{Error, ErrorKind, Result};

/// Trait for Salesforce credentials.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the access token.
    fn access_token(&self) -> &str;

    /// Get the API version (e.g., "62.0").
    fn api_version(&self) -> &str;

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().is_empty() && !self.access_token().is_empty()
    }
}

/// Standard Salesforce credentials implementation.
///
/// The access token is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone)]
pub struct SalesforceCredentials {
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl SalesforceCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: api_version.into(),
        }
    }

    /// Resolve credentials from the environment.
    ///
    /// Reads `SF_INSTANCE_URL` and `SF_ACCESS_TOKEN`, plus an optional
    /// `SF_API_VERSION` (defaults to [`crate::DEFAULT_API_VERSION`]).
    pub fn from_env() -> Result<Self> {
        let instance_url = require_env("SF_INSTANCE_URL")?;
        let access_token = require_env("SF_ACCESS_TOKEN")?;
        let api_version = std::env::var("SF_API_VERSION")
            .unwrap_or_else(|_| crate::DEFAULT_API_VERSION.to_string());

        Ok(Self::new(instance_url, access_token, api_version))
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| {
        Error::new(ErrorKind::Config(format!(
            "environment variable {name} is not set"
        )))
    })
}

impl Credentials for SalesforceCredentials {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}
