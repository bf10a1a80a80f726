//! Typed request/response dispatch
//!
//! Every gateway operation goes through [`Dispatcher::dispatch`]: the shared
//! key is injected, the request is encoded, sent, and the answer classified
//! into exactly one outcome in this order:
//!
//! 1. transport failure → [`PaymentError::Transport`]
//! 2. status outside 2xx → [`PaymentError::HttpStatus`] (body not parsed)
//! 3. body not matching the response type → [`PaymentError::Decoding`]
//! 4. `Success: false` → [`PaymentError::Application`]

use crate::error::{PaymentError, PaymentResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use themap_http_client::{HttpClient, Method};
use tracing::debug;
use url::Url;

/// Decode `null` as the field's default, the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `key` field carried by every request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestKey {
    #[serde(default)]
    pub key: String,
}

/// The `Success` / `ErrCode` / `ErrMessage` envelope of every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "ErrCode", default, deserialize_with = "null_as_default")]
    pub err_code: String,
    #[serde(rename = "ErrMessage", default, deserialize_with = "null_as_default")]
    pub err_message: String,
}

/// A request that accepts the service authentication key.
pub trait KeyedRequest {
    fn request_key_mut(&mut self) -> &mut RequestKey;

    fn set_key(&mut self, key: &str) {
        self.request_key_mut().key = key.to_string();
    }
}

/// A response that carries the success envelope.
pub trait GatewayResponse {
    fn envelope(&self) -> &ResponseEnvelope;

    fn success(&self) -> bool {
        self.envelope().success
    }

    fn err_code(&self) -> &str {
        &self.envelope().err_code
    }

    fn err_message(&self) -> &str {
        &self.envelope().err_message
    }
}

/// Sends typed requests to one gateway with one key.
pub struct Dispatcher {
    http: HttpClient,
    base_url: Url,
    key: SecretString,
}

impl Dispatcher {
    pub fn new(http: HttpClient, base_url: Url, key: SecretString) -> Self {
        Self {
            http,
            base_url,
            key,
        }
    }

    /// Gateway base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL path. The base query is kept and the
    /// fragment dropped.
    pub fn endpoint_url(&self, path: &str) -> PaymentResult<Url> {
        let mut url = self.base_url.clone();
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| PaymentError::Config("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Send `request` to the `path` endpoint and decode the answer as `Res`.
    pub async fn dispatch<Req, Res>(
        &self,
        method: Method,
        path: &str,
        mut request: Req,
    ) -> PaymentResult<Res>
    where
        Req: KeyedRequest + Serialize,
        Res: GatewayResponse + DeserializeOwned,
    {
        request.set_key(self.key.expose_secret());

        let body = serde_json::to_vec(&request).map_err(PaymentError::Encoding)?;

        debug!(method = %method, path = path, "Dispatching gateway request");

        let url = self.endpoint_url(path)?;
        let response = self
            .http
            .request(method, url)
            .json_bytes(body)
            .send()
            .await?;

        if !response.is_success() {
            let status = response.status();
            debug!(
                path = path,
                status = status.as_u16(),
                body_len = response.bytes().len(),
                "Gateway returned error status"
            );
            return Err(PaymentError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let decoded: Res = response.json().map_err(PaymentError::Decoding)?;

        if !decoded.success() {
            debug!(
                path = path,
                err_code = decoded.err_code(),
                "Gateway rejected request"
            );
            return Err(PaymentError::Application {
                code: decoded.err_code().to_string(),
                message: decoded.err_message().to_string(),
            });
        }

        Ok(decoded)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url.as_str())
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Implements [`KeyedRequest`] for types with a `base: RequestKey` field.
macro_rules! keyed_request {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::dispatch::KeyedRequest for $ty {
                fn request_key_mut(&mut self) -> &mut $crate::dispatch::RequestKey {
                    &mut self.base
                }
            }
        )+
    };
}

/// Implements [`GatewayResponse`] for types with an `envelope: ResponseEnvelope` field.
macro_rules! gateway_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::dispatch::GatewayResponse for $ty {
                fn envelope(&self) -> &$crate::dispatch::ResponseEnvelope {
                    &self.envelope
                }
            }
        )+
    };
}

pub(crate) use {gateway_response, keyed_request};
