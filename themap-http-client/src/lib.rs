//! # themap HTTP client
//!
//! The transport underneath the MAP gateway client: a thin wrapper over
//! `reqwest` that sends a request, buffers the whole response body and hands
//! the status, headers and bytes back to the caller for classification.
//!
//! There is deliberately no retry, caching or circuit breaking here. Every
//! request is bounded by the configured timeouts and either yields a
//! [`Response`] (whatever its status) or an [`HttpClientError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use themap_http_client::{HttpClient, HttpClientConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HttpClientConfig::builder()
//!         .timeout(Duration::from_secs(15))
//!         .build();
//!     let client = HttpClient::new(config)?;
//!
//!     let response = client
//!         .post("https://gw.example.com/api/getState")
//!         .json(&serde_json::json!({"key": "k", "merchant_order_id": "m-1"}))?
//!         .send()
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use error::{HttpClientError, Result};
pub use request::RequestBuilder;
pub use response::Response;

// Re-export common types
pub use http::{Method, StatusCode};

/// Prelude for common imports.
///
/// ```
/// use themap_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::HttpClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder};
    pub use crate::error::{HttpClientError, Result};
    pub use crate::request::RequestBuilder;
    pub use crate::response::Response;
    pub use http::{Method, StatusCode};
}
