//! Unified error types for the browsy data layer.
//!
//! Every message starts with a stable code so hosts can match on it without
//! parsing free text.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for browsy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A component was constructed with values that break its invariants.
    #[error("INVALID_CONFIG: {0}")]
    InvalidConfig(String),

    /// An upstream book source failed (transport, status, or decode).
    #[error("UPSTREAM_ERROR: {source_name}: {message}")]
    Upstream { source_name: String, message: String },

    /// Upstream rejected our credentials.
    #[error("UPSTREAM_AUTH_ERROR: {0}")]
    UpstreamAuth(String),

    /// Upstream rate limited us.
    #[error("UPSTREAM_RATE_LIMITED: {0}")]
    UpstreamRateLimited(String),

    /// Durable blob storage failed.
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),

    /// SQLite operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Database(#[from] rusqlite::Error),

    /// Shelf blob could not be encoded or decoded.
    #[error("SERIALIZATION_ERROR: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an [`Error::Upstream`] with the given source name.
    pub fn upstream(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Upstream { source_name: source_name.into(), message: message.into() }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::InvalidConfig(_) => -32603,
            Error::Upstream { .. } => -32008,
            Error::UpstreamAuth(_) => -32009,
            Error::UpstreamRateLimited(_) => -32010,
            Error::Storage(_) | Error::Database(_) | Error::Io(_) => -32002,
            Error::Serialization(_) => -32000,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::upstream("google_books", "HTTP 503");
        assert!(err.to_string().starts_with("UPSTREAM_ERROR"));
        assert!(err.to_string().contains("google_books"));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("query cannot be empty".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert!(mcp_err.message.contains("query cannot be empty"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32002);
    }
}
