//! Typed client for the MAP card-payment gateway
//!
//! Each gateway operation is a typed request/response pair sent through one
//! generic [`Dispatcher`], which injects the shared key, posts JSON and folds
//! every failure into [`PaymentError`].
//!
//! ## Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     MapPaymentService                         │
//! │  init | block | block_3ds | charge | unblock | refund | ...  │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Dispatcher                            │
//! │  set key → encode → POST → status → decode → Success flag    │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                     themap-http-client
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use themap_payments::{CardData, BlockRequest, MapClient, MapConfig, MapPaymentService};
//!
//! # async fn run() -> themap_payments::PaymentResult<()> {
//! let client = MapClient::new(
//!     MapConfig::builder()
//!         .base_url("https://gw.example.com/api")
//!         .key("merchant-key")
//!         .build()?,
//! )?;
//!
//! let card = CardData::new("4111111111111111", 12, 2030).cvv("123");
//! let blocked = client.block(BlockRequest::new("order-1001", 45000, card)).await?;
//!
//! if blocked.requires_3ds() {
//!     // redirect the cardholder to blocked.acs_url, then:
//!     client.block_3ds("order-1001", "pares-from-acs").await?;
//! }
//!
//! client.charge(&blocked.order_id, 45000).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod messages;
pub mod service;
pub mod state;
pub mod types;

pub use config::*;
pub use dispatch::{Dispatcher, GatewayResponse, KeyedRequest, RequestKey, ResponseEnvelope};
pub use error::*;
pub use messages::*;
pub use service::*;
pub use state::*;
pub use types::*;
