//! Client configuration

use crate::error::{PaymentError, PaymentResult};
use secrecy::SecretString;
use std::time::Duration;
use themap_http_client::HttpClientConfig;

/// Gateway base URL variable for [`MapConfig::from_env`].
pub const ENV_BASE_URL: &str = "THEMAP_BASE_URL";
/// Shared authentication key variable.
pub const ENV_KEY: &str = "THEMAP_KEY";
/// Optional request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "THEMAP_TIMEOUT_SECS";

/// Everything a [`MapClient`](crate::MapClient) needs.
#[derive(Debug)]
pub struct MapConfig {
    /// Gateway base URL; endpoint paths are appended to it
    pub base_url: String,
    /// Shared authentication key injected into every request
    pub key: SecretString,
    /// Transport settings
    pub http: HttpClientConfig,
}

impl MapConfig {
    /// Create a configuration builder
    pub fn builder() -> MapConfigBuilder {
        MapConfigBuilder::default()
    }

    /// Load from `THEMAP_BASE_URL`, `THEMAP_KEY` and `THEMAP_TIMEOUT_SECS`
    pub fn from_env() -> PaymentResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PaymentResult<Self> {
        let mut builder = Self::builder();

        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }
        if let Some(key) = lookup(ENV_KEY) {
            builder = builder.key(key);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PaymentError::Config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

/// Builder for [`MapConfig`].
#[derive(Debug, Default)]
pub struct MapConfigBuilder {
    base_url: Option<String>,
    key: Option<SecretString>,
    http: HttpClientConfig,
}

impl MapConfigBuilder {
    /// Gateway base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Shared authentication key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        let key: String = key.into();
        self.key = Some(SecretString::new(key.into()));
        self
    }

    /// Request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http.connect_timeout = timeout;
        self
    }

    /// Replace the transport settings
    pub fn http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Build the configuration
    pub fn build(self) -> PaymentResult<MapConfig> {
        let base_url = self
            .base_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| PaymentError::Config("base URL is required".to_string()))?;
        let key = self
            .key
            .ok_or_else(|| PaymentError::Config("authentication key is required".to_string()))?;

        Ok(MapConfig {
            base_url,
            key,
            http: self.http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_builder_requires_url_and_key() {
        assert!(matches!(
            MapConfig::builder().key("k").build(),
            Err(PaymentError::Config(_))
        ));
        assert!(matches!(
            MapConfig::builder().base_url("https://gw.example.com").build(),
            Err(PaymentError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = MapConfig::builder()
            .base_url("https://gw.example.com")
            .key("top-secret")
            .build()
            .unwrap();
        assert!(!format!("{:?}", config).contains("top-secret"));
        assert_eq!(config.key.expose_secret(), "top-secret");
    }

    #[test]
    fn test_from_lookup() {
        let config = MapConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://gw.example.com/api"),
            (ENV_KEY, "k-1"),
            (ENV_TIMEOUT_SECS, "12"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://gw.example.com/api");
        assert_eq!(config.http.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result = MapConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://gw.example.com"),
            (ENV_KEY, "k"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert!(matches!(result, Err(PaymentError::Config(_))));
    }
}
