//! Error types for search backend operations.

use thiserror::Error;

/// Search backend error type.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The service could not be reached or the transport failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Index not found.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Index already exists.
    #[error("Index already exists: {0}")]
    IndexExists(String),

    /// The service rejected the index settings or mapping at creation.
    #[error("Mapping conflict: {0}")]
    MappingConflict(String),

    /// The service rejected the query.
    #[error("Query error: {0}")]
    Query(String),

    /// Invalid input rejected before anything was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other error reported by the service.
    #[error("Search service error: {0}")]
    Internal(String),

    /// Client error from the opensearch crate.
    #[error("Client error: {0}")]
    Client(#[from] opensearch::Error),
}

/// Coarse classification of a [`SearchError`], used when reporting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Service unreachable or transport failure.
    Connectivity,
    /// Index already exists or its mapping conflicts, both at bootstrap.
    IndexExists,
    /// Query rejected by the service.
    MalformedQuery,
    /// Index missing.
    NotFound,
    /// Everything else.
    Other,
}

impl ErrorKind {
    /// Short name for log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::IndexExists => "index-exists",
            ErrorKind::MalformedQuery => "malformed-query",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SearchError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Connection(_) | SearchError::Client(_) => ErrorKind::Connectivity,
            SearchError::IndexExists(_) | SearchError::MappingConflict(_) => {
                ErrorKind::IndexExists
            }
            SearchError::Query(_) => ErrorKind::MalformedQuery,
            SearchError::IndexNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }

    /// Pull `error.reason` (or a plain string `error`) out of a failed response body.
    pub(crate) fn reason_from_body(body: &serde_json::Value, fallback: &str) -> String {
        body.get("error")
            .and_then(|e| e.get("reason").or(Some(e)))
            .and_then(|r| r.as_str())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Result type alias for search backend operations.
pub type Result<T> = std::result::Result<T, SearchError>;
