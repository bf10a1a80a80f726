// themap - typed client for the MAP card-payment gateway
//
// Re-exports the gateway client and its HTTP transport so applications can
// depend on a single crate.

// Re-export the gateway client
pub use themap_payments::*;

// Re-export the transport crate
pub use themap_http_client;

// Prelude for common imports
pub mod prelude {
    pub use themap_payments::{
        BlockRequest, CardData, CardInfo, Credential, ExtraFz54, Fz54Good, InitRequest,
        MapClient, MapConfig, MapPaymentService, OrderState, PaymentError, PaymentResult,
        RefundRequest, RemoveCardRequest, StoreCardRequest, UnblockRequest,
    };
}
