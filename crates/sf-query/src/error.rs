//! Error types for sf-extract-query.

use std::path::Path;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Build a sink error carrying the destination path.
    pub(crate) fn sink(
        path: &Path,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ErrorKind::Sink {
                path: path.display().to_string(),
                message: source.to_string(),
            },
            source: Some(Box::new(source)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Positional placeholder count does not match the supplied parameters.
    /// A caller bug: never retried, never sent to the API.
    #[error("Parameter binding failed: query has {expected} placeholders, {supplied} parameters supplied")]
    Binding { expected: usize, supplied: usize },

    /// The API rejected the query or the transport failed.
    #[error("Query execution failed: {0}")]
    Query(String),

    /// The destination could not be opened or a write failed partway.
    #[error("Failed writing {path}: {message}")]
    Sink { path: String, message: String },
}

impl From<sf_extract_client::Error> for Error {
    fn from(err: sf_extract_client::Error) -> Self {
        Error {
            kind: ErrorKind::Query(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_error_display() {
        let err = Error::new(ErrorKind::Binding {
            expected: 2,
            supplied: 1,
        });
        assert!(err.to_string().contains("2 placeholders"));
        assert!(err.to_string().contains("1 parameters"));
    }

    #[test]
    fn test_query_error_wraps_client_error() {
        let client_err = sf_extract_client::Error::new(
            sf_extract_client::ErrorKind::Authentication("Session expired".into()),
        );
        let err: Error = client_err.into();
        assert!(matches!(err.kind, ErrorKind::Query(_)));
        assert!(err.to_string().contains("Session expired"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_sink_error_carries_path() {
        let io_err = std::io::Error::other("disk full");
        let err = Error::sink(Path::new("/tmp/out.csv"), io_err);
        assert!(err.to_string().contains("/tmp/out.csv"));
        assert!(err.to_string().contains("disk full"));
    }
}
