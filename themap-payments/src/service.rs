//! Gateway service trait and the HTTP-backed client

use crate::{
    config::MapConfig,
    dispatch::Dispatcher,
    error::{PaymentError, PaymentResult},
    messages::*,
};
use async_trait::async_trait;
use std::sync::Arc;
use themap_http_client::{HttpClient, Method};
use url::Url;

/// Endpoint paths relative to the gateway base URL.
pub mod endpoints {
    pub const INIT: &str = "/Init";
    pub const BLOCK: &str = "/Block";
    pub const BLOCK_3DS: &str = "/Block3DS";
    pub const CHARGE: &str = "/Charge";
    pub const GET_STATE: &str = "/getState";
    pub const UNBLOCK: &str = "/Unblock";
    pub const REFUND: &str = "/Refund";
    pub const STORE_CARD: &str = "/storeCard";
    pub const REMOVE_CARD: &str = "/removeCard";

    /// Hosted payment page segment, appended to the base URL path
    pub const CREATE_PAYMENT: &str = "createPayment";
    /// Query parameter carrying the session for the hosted page
    pub const SESSION_ID_PARAM: &str = "SessionID";
}

/// Gateway operations.
///
/// The client keeps no order state: calling an operation the order is not
/// ready for is rejected by the gateway as [`PaymentError::Application`].
#[async_trait]
pub trait MapPaymentService: Send + Sync {
    /// Open a session; the order starts in `New`
    async fn init(&self, request: InitRequest) -> PaymentResult<InitResponse>;

    /// Hosted payment page URL for a session returned by `init`
    fn create_payment_url(&self, session_id: &str) -> PaymentResult<Url>;

    /// Authorize an amount on a card
    async fn block(&self, request: BlockRequest) -> PaymentResult<BlockResponse>;

    /// Finish an authorization with the 3-D Secure `PaRes`
    async fn block_3ds(&self, merchant_order_id: &str, pares: &str)
        -> PaymentResult<Block3DSResponse>;

    /// Capture an authorized amount
    async fn charge(&self, map_order_id: &str, amount: i64) -> PaymentResult<ChargeResponse>;

    /// Current order state
    async fn get_state(&self, merchant_order_id: &str) -> PaymentResult<OrderStateResponse>;

    /// Void an authorization
    async fn unblock(&self, request: UnblockRequest) -> PaymentResult<UnblockResponse>;

    /// Refund a charged order
    async fn refund(&self, request: RefundRequest) -> PaymentResult<RefundResponse>;

    /// Store a card
    async fn store_card(&self, request: StoreCardRequest) -> PaymentResult<StoreCardResponse>;

    /// Remove a stored card
    async fn remove_card(&self, request: RemoveCardRequest) -> PaymentResult<RemoveCardResponse>;
}

/// MAP gateway client.
#[derive(Clone, Debug)]
pub struct MapClient {
    dispatcher: Arc<Dispatcher>,
}

impl MapClient {
    /// Create a client from configuration
    pub fn new(config: MapConfig) -> PaymentResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(PaymentError::Config(format!(
                "base URL must be an http(s) URL: {}",
                config.base_url
            )));
        }

        let http = HttpClient::new(config.http).map_err(PaymentError::ClientBuild)?;

        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(http, base_url, config.key)),
        })
    }

    /// Get the dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[async_trait]
impl MapPaymentService for MapClient {
    async fn init(&self, request: InitRequest) -> PaymentResult<InitResponse> {
        self.dispatcher
            .dispatch(Method::POST, endpoints::INIT, request)
            .await
    }

    fn create_payment_url(&self, session_id: &str) -> PaymentResult<Url> {
        let mut url = self.dispatcher.endpoint_url(endpoints::CREATE_PAYMENT)?;

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != endpoints::SESSION_ID_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(endpoints::SESSION_ID_PARAM, session_id);

        Ok(url)
    }

    async fn block(&self, request: BlockRequest) -> PaymentResult<BlockResponse> {
        self.dispatcher
            .dispatch(Method::POST, endpoints::BLOCK, request)
            .await
    }

    async fn block_3ds(
        &self,
        merchant_order_id: &str,
        pares: &str,
    ) -> PaymentResult<Block3DSResponse> {
        let request = Block3DSRequest::new(merchant_order_id, pares);
        self.dispatcher
            .dispatch(Method::POST, endpoints::BLOCK_3DS, request)
            .await
    }

    async fn charge(&self, map_order_id: &str, amount: i64) -> PaymentResult<ChargeResponse> {
        let request = ChargeRequest::new(map_order_id, amount);
        self.dispatcher
            .dispatch(Method::POST, endpoints::CHARGE, request)
            .await
    }

    async fn get_state(&self, merchant_order_id: &str) -> PaymentResult<OrderStateResponse> {
        let request = OrderStateRequest::new(merchant_order_id);
        self.dispatcher
            .dispatch(Method::POST, endpoints::GET_STATE, request)
            .await
    }

    async fn unblock(&self, request: UnblockRequest) -> PaymentResult<UnblockResponse> {
        self.dispatcher
            .dispatch(Method::POST, endpoints::UNBLOCK, request)
            .await
    }

    async fn refund(&self, request: RefundRequest) -> PaymentResult<RefundResponse> {
        self.dispatcher
            .dispatch(Method::POST, endpoints::REFUND, request)
            .await
    }

    async fn store_card(&self, request: StoreCardRequest) -> PaymentResult<StoreCardResponse> {
        self.dispatcher
            .dispatch(Method::POST, endpoints::STORE_CARD, request)
            .await
    }

    async fn remove_card(&self, request: RemoveCardRequest) -> PaymentResult<RemoveCardResponse> {
        self.dispatcher
            .dispatch(Method::POST, endpoints::REMOVE_CARD, request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use themap_http_client::{HttpClientConfig, HttpClientError};

    fn client(base_url: &str) -> MapClient {
        MapClient::new(MapConfig::builder().base_url(base_url).key("k").build().unwrap()).unwrap()
    }

    #[test]
    fn test_create_payment_url() {
        let url = client("https://gw.example.com/api")
            .create_payment_url("abc123")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://gw.example.com/api/createPayment?SessionID=abc123"
        );
    }

    #[test]
    fn test_create_payment_url_trailing_slash_and_bare_host() {
        let url = client("https://gw.example.com/api/")
            .create_payment_url("s")
            .unwrap();
        assert_eq!(url.as_str(), "https://gw.example.com/api/createPayment?SessionID=s");

        let url = client("https://gw.example.com").create_payment_url("s").unwrap();
        assert_eq!(url.as_str(), "https://gw.example.com/createPayment?SessionID=s");
    }

    #[test]
    fn test_create_payment_url_encodes_and_keeps_query() {
        let url = client("https://gw.example.com/api?lang=ru&SessionID=old")
            .create_payment_url("a b&c")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://gw.example.com/api/createPayment?lang=ru&SessionID=a+b%26c"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let config = MapConfig::builder()
            .base_url("mailto:gw@example.com")
            .key("k")
            .build()
            .unwrap();
        assert!(matches!(MapClient::new(config), Err(PaymentError::Config(_))));

        let config = MapConfig::builder().base_url("not a url").key("k").build().unwrap();
        assert!(matches!(MapClient::new(config), Err(PaymentError::InvalidUrl(_))));
    }

    #[test]
    fn test_http_client_build_failure_keeps_source() {
        let http = HttpClientConfig::builder().user_agent("shop\n1.0").build();
        let config = MapConfig::builder()
            .base_url("https://gw.example.com")
            .key("k")
            .http(http)
            .build()
            .unwrap();

        let err = MapClient::new(config).unwrap_err();
        assert!(matches!(
            err,
            PaymentError::ClientBuild(HttpClientError::Build(_))
        ));
        assert!(std::error::Error::source(&err).is_some());
    }
}
