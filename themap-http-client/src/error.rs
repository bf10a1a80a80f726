//! HTTP client error types.

use thiserror::Error;

/// Result type for HTTP client operations.
pub type Result<T> = std::result::Result<T, HttpClientError>;

/// Failures that prevent a request from producing a response.
///
/// A response with a non-2xx status is not an error at this layer; the
/// caller decides what a status means.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The underlying client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request body could not be encoded as JSON.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connect, send, timeout or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl HttpClientError {
    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_not_a_timeout() {
        let err: HttpClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(!err.is_timeout());
        assert!(!err.is_connection());
        assert!(err.to_string().starts_with("Invalid URL"));
    }
}
