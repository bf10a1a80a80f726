//! Request builder.

use crate::{HttpClient, Response, Result};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;

/// HTTP request builder.
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a HttpClient, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set an already encoded JSON document as the body.
    pub fn json_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(bytes);
        self
    }

    /// Serialize `json` and set it as the body.
    pub fn json<T: Serialize + ?Sized>(self, json: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(json)?;
        Ok(self.json_bytes(bytes))
    }

    /// Send the request.
    pub async fn send(self) -> Result<Response> {
        let url = url::Url::parse(&self.url)?;

        let mut request = self.client.inner().request(self.method, url);

        for (name, value) in &self.client.config().default_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if let Some(body) = self.body {
            request = request.body(body);
        }

        self.client.execute(request.build()?).await
    }
}

#[cfg(test)]
mod tests {
    use crate::{HttpClient, HttpClientConfig, HttpClientError};
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_json_body_sets_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"map_order_id": "ord-1", "amount": 500})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(HttpClientConfig::default()).unwrap();
        let response = client
            .post(server.uri())
            .json(&serde_json::json!({"map_order_id": "ord-1", "amount": 500}))
            .unwrap()
            .send()
            .await
            .unwrap();

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_relative_url_is_rejected() {
        let client = HttpClient::new(HttpClientConfig::default()).unwrap();
        let err = client.post("/Init").send().await.unwrap_err();

        assert!(matches!(err, HttpClientError::InvalidUrl(_)));
    }
}
