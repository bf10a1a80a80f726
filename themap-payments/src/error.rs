//! Error types for gateway calls

use themap_http_client::HttpClientError;
use thiserror::Error;

/// Everything a gateway call can fail with.
///
/// For dispatched calls the variants are checked in a fixed order:
/// `Transport`, then `HttpStatus`, then `Decoding`, then `Application`.
/// A call yields at most one of them.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Request body could not be serialized
    #[error("Encoding error: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The call never reached the gateway or never returned from it
    #[error("Transport error: {0}")]
    Transport(#[from] HttpClientError),

    /// Gateway answered outside 2xx; the body is not interpreted
    #[error("response statusCode: {status}")]
    HttpStatus { status: u16 },

    /// A 2xx body did not match the expected response schema
    #[error("Decoding error: {0}")]
    Decoding(#[source] serde_json::Error),

    /// Gateway reported `Success: false`
    #[error("{}", application_message(.code, .message))]
    Application { code: String, message: String },

    /// Base URL or derived URL is malformed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built from its configuration
    #[error("HTTP client setup error: {0}")]
    ClientBuild(#[source] HttpClientError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn application_message(code: &str, message: &str) -> String {
    if message.is_empty() {
        code.to_string()
    } else {
        format!("{} {}", code, message)
    }
}

impl PaymentError {
    /// Network-level failure (connect, timeout, body read).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The transport deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Business rejection reported by the gateway.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }

    /// HTTP status of a non-2xx answer.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Gateway `ErrCode` of an application rejection.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Application { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type for gateway operations
pub type PaymentResult<T> = Result<T, PaymentError>;
