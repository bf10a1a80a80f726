//! Request and response bodies, one pair per gateway operation
//!
//! Requests flatten [`RequestKey`] (and, where the gateway accepts one, an
//! [`ExtraFz54`] receipt) into their JSON object. Responses flatten the
//! [`ResponseEnvelope`] and default any domain field the gateway leaves out
//! or sends as `null`.

use crate::dispatch::{
    RequestKey, ResponseEnvelope, gateway_response, keyed_request, null_as_default,
};
use crate::state::OrderState;
use crate::types::{CardData, CardInfo, Credential, ExtraFz54, PaymentType, SessionType, StoredCard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Init
// =============================================================================

/// Open a payment (or card binding) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    #[serde(flatten)]
    pub fz54: Option<ExtraFz54>,
    pub add_card: bool,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub payment_type: PaymentType,
    /// Session lifetime in seconds; gateway default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<u32>,
    pub merchant_order_id: String,
    /// Amount in minor units
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_params_raw: Option<String>,
    pub recurrent: bool,
}

impl InitRequest {
    /// One-step payment session for `amount` minor units
    pub fn new(merchant_order_id: impl Into<String>, amount: i64) -> Self {
        Self {
            base: RequestKey::default(),
            fz54: None,
            add_card: false,
            session_type: SessionType::Pay,
            payment_type: PaymentType::OneStep,
            lifetime: None,
            merchant_order_id: merchant_order_id.into(),
            amount,
            credential: None,
            custom_params_raw: None,
            recurrent: false,
        }
    }

    /// Session type (`pay` or `add`)
    pub fn session_type(mut self, session_type: SessionType) -> Self {
        self.session_type = session_type;
        self
    }

    /// Authorize now, capture later with `Charge`
    pub fn two_step(mut self) -> Self {
        self.payment_type = PaymentType::TwoStep;
        self
    }

    /// Offer to store the card used on the payment page
    pub fn add_card(mut self, add_card: bool) -> Self {
        self.add_card = add_card;
        self
    }

    /// Mark as the first payment of a recurrent series
    pub fn recurrent(mut self, recurrent: bool) -> Self {
        self.recurrent = recurrent;
        self
    }

    /// Session lifetime in seconds
    pub fn lifetime(mut self, seconds: u32) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Merchant credential
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Raw custom parameters string passed through to the gateway
    pub fn custom_params_raw(mut self, raw: impl Into<String>) -> Self {
        self.custom_params_raw = Some(raw.into());
        self
    }

    /// Attach a fiscal receipt
    pub fn fz54(mut self, fz54: ExtraFz54) -> Self {
        self.fz54 = Some(fz54);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "Amount", deserialize_with = "null_as_default")]
    pub amount: i64,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub session_type: String,
    #[serde(rename = "SessionGUID", deserialize_with = "null_as_default")]
    pub session_guid: String,
}

// =============================================================================
// Block
// =============================================================================

/// Authorize (hold) an amount on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    #[serde(flatten)]
    pub fz54: Option<ExtraFz54>,
    pub card: CardInfo,
    pub merchant_order_id: String,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_params_rdy: Option<HashMap<String, String>>,
}

impl BlockRequest {
    pub fn new(merchant_order_id: impl Into<String>, amount: i64, card: impl Into<CardInfo>) -> Self {
        Self {
            base: RequestKey::default(),
            fz54: None,
            card: card.into(),
            merchant_order_id: merchant_order_id.into(),
            amount,
            credential: None,
            custom_params_rdy: None,
        }
    }

    /// Merchant credential
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Add a custom parameter
    pub fn custom_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_params_rdy
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a fiscal receipt
    pub fn fz54(mut self, fz54: ExtraFz54) -> Self {
        self.fz54 = Some(fz54);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "Amount", deserialize_with = "null_as_default")]
    pub amount: i64,
    /// 3-D Secure access control server to redirect the cardholder to
    #[serde(rename = "ACSUrl", deserialize_with = "null_as_default")]
    pub acs_url: String,
    #[serde(rename = "PaReq", deserialize_with = "null_as_default")]
    pub pa_req: String,
    #[serde(rename = "ThreeDSKey", deserialize_with = "null_as_default")]
    pub three_ds_key: String,
    #[serde(rename = "Is3DSVer1", deserialize_with = "null_as_default")]
    pub is_3ds_ver1: bool,
}

impl BlockResponse {
    /// The cardholder must pass a 3-D Secure challenge before `Block3DS`.
    pub fn requires_3ds(&self) -> bool {
        !self.acs_url.is_empty()
    }
}

// =============================================================================
// Block3DS
// =============================================================================

/// Complete an authorization after the 3-D Secure challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block3DSRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    pub merchant_order_id: String,
    pub pares: String,
}

impl Block3DSRequest {
    pub fn new(merchant_order_id: impl Into<String>, pares: impl Into<String>) -> Self {
        Self {
            base: RequestKey::default(),
            merchant_order_id: merchant_order_id.into(),
            pares: pares.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block3DSResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "Amount", deserialize_with = "null_as_default")]
    pub amount: i64,
}

// =============================================================================
// Charge / Unblock
// =============================================================================

/// Capture a previously blocked amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    pub map_order_id: String,
    pub amount: i64,
}

impl ChargeRequest {
    pub fn new(map_order_id: impl Into<String>, amount: i64) -> Self {
        Self {
            base: RequestKey::default(),
            map_order_id: map_order_id.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "Key", deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(rename = "Amount", deserialize_with = "null_as_default")]
    pub amount: i64,
}

/// Release (void) a blocked amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnblockRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    pub map_order_id: String,
    pub amount: i64,
}

impl UnblockRequest {
    pub fn new(map_order_id: impl Into<String>, amount: i64) -> Self {
        Self {
            base: RequestKey::default(),
            map_order_id: map_order_id.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnblockResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "NewAmount", deserialize_with = "null_as_default")]
    pub new_amount: i64,
}

// =============================================================================
// Refund
// =============================================================================

/// Return charged funds to the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    #[serde(flatten)]
    pub fz54: Option<ExtraFz54>,
    pub map_order_id: String,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_params_rdy: Option<HashMap<String, String>>,
}

impl RefundRequest {
    pub fn new(map_order_id: impl Into<String>, amount: i64) -> Self {
        Self {
            base: RequestKey::default(),
            fz54: None,
            map_order_id: map_order_id.into(),
            amount,
            credential: None,
            custom_params_rdy: None,
        }
    }

    /// Merchant credential
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Add a custom parameter
    pub fn custom_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_params_rdy
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a refund receipt
    pub fn fz54(mut self, fz54: ExtraFz54) -> Self {
        self.fz54 = Some(fz54);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "NewAmount", deserialize_with = "null_as_default")]
    pub new_amount: i64,
}

// =============================================================================
// getState
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStateRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    pub merchant_order_id: String,
}

impl OrderStateRequest {
    pub fn new(merchant_order_id: impl Into<String>) -> Self {
        Self {
            base: RequestKey::default(),
            merchant_order_id: merchant_order_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderStateResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "Amount", deserialize_with = "null_as_default")]
    pub amount: i64,
    #[serde(rename = "State", deserialize_with = "null_as_default")]
    pub state: OrderState,
    #[serde(rename = "MerchantOrderId", deserialize_with = "null_as_default")]
    pub merchant_order_id: String,
    #[serde(rename = "FeePercent", skip_serializing_if = "Option::is_none")]
    pub fee_percent: Option<f64>,
    #[serde(rename = "CardType", deserialize_with = "null_as_default")]
    pub card_type: String,
    #[serde(rename = "PanMask", deserialize_with = "null_as_default")]
    pub pan_mask: String,
}

// =============================================================================
// storeCard / removeCard
// =============================================================================

/// Store a card for later use by uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreCardRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    #[serde(flatten)]
    pub fz54: Option<ExtraFz54>,
    pub merchant_order_id: String,
    pub amount: i64,
    pub card: CardData,
    /// Capitalized on the wire for this endpoint only.
    #[serde(rename = "Credential")]
    pub credential: Credential,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_params_rdy: Option<HashMap<String, String>>,
}

impl StoreCardRequest {
    pub fn new(
        merchant_order_id: impl Into<String>,
        amount: i64,
        card: CardData,
        credential: Credential,
    ) -> Self {
        Self {
            base: RequestKey::default(),
            fz54: None,
            merchant_order_id: merchant_order_id.into(),
            amount,
            card,
            credential,
            custom_params_rdy: None,
        }
    }

    /// Add a custom parameter
    pub fn custom_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_params_rdy
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a fiscal receipt
    pub fn fz54(mut self, fz54: ExtraFz54) -> Self {
        self.fz54 = Some(fz54);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreCardResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "CardUId", deserialize_with = "null_as_default")]
    pub card_uid: String,
    #[serde(rename = "PANMask", deserialize_with = "null_as_default")]
    pub pan_mask: String,
    #[serde(rename = "IsActive", deserialize_with = "null_as_default")]
    pub is_active: bool,
}

/// Delete a stored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveCardRequest {
    #[serde(flatten)]
    pub base: RequestKey,
    pub credential: Credential,
    pub card: StoredCard,
}

impl RemoveCardRequest {
    pub fn new(credential: Credential, uid: impl Into<String>) -> Self {
        Self {
            base: RequestKey::default(),
            credential,
            card: StoredCard::new(uid),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveCardResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    #[serde(rename = "CardUId", deserialize_with = "null_as_default")]
    pub card_uid: String,
}

keyed_request!(
    InitRequest,
    BlockRequest,
    Block3DSRequest,
    ChargeRequest,
    UnblockRequest,
    RefundRequest,
    OrderStateRequest,
    StoreCardRequest,
    RemoveCardRequest,
);

gateway_response!(
    InitResponse,
    BlockResponse,
    Block3DSResponse,
    ChargeResponse,
    UnblockResponse,
    RefundResponse,
    OrderStateResponse,
    StoreCardResponse,
    RemoveCardResponse,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Fz54Cheque, Fz54Good, Fz54Supplier};
    use serde_json::json;

    fn receipt() -> ExtraFz54 {
        ExtraFz54::new(vec![
            Fz54Good::new("Coffee beans", "450.00")
                .tax(1)
                .payment_method_type(4)
                .supplier(Fz54Supplier {
                    name: "Roastery".into(),
                    inn: "7701234567".into(),
                    phone_numbers: vec!["+79990000000".into()],
                }),
        ])
        .cheque(Fz54Cheque {
            additional_attribute: Some("loyalty-42".into()),
            penalty_attribute: None,
        })
    }

    #[test]
    fn test_init_request_wire_shape() {
        let request = InitRequest::new("m-1001", 45000).two_step().lifetime(600);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "key": "",
                "add_card": false,
                "type": "pay",
                "payment_type": "TwoStep",
                "lifetime": 600,
                "merchant_order_id": "m-1001",
                "amount": 45000,
                "recurrent": false
            })
        );
    }

    #[test]
    fn test_init_request_with_receipt_round_trips() {
        let request = InitRequest::new("m-1002", 45000)
            .credential(Credential::new("shop", "pw", "Shop", "mpw", "tpw"))
            .fz54(receipt());

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["cheque"], json!({"additional_attribute": "loyalty-42"}));
        assert_eq!(
            encoded["goods"][0],
            json!({
                "name": "Coffee beans",
                "price": "450.00",
                "tax": 1,
                "payment_method_type": 4,
                "supplier": {
                    "name": "Roastery",
                    "inn": "7701234567",
                    "phone_numbers": ["+79990000000"]
                }
            })
        );
        assert!(encoded.get("lifetime").is_none());
        assert!(encoded.get("custom_params_raw").is_none());

        let decoded: InitRequest = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, request);

        let good = &decoded.fz54.as_ref().unwrap().goods[0];
        assert_eq!(good.payment_subject_type, None);
        assert_eq!(good.agent_type, None);
    }

    #[test]
    fn test_request_without_receipt_decodes_without_receipt() {
        let request = RefundRequest::new("ord-9", 100);
        let decoded: RefundRequest =
            serde_json::from_value(serde_json::to_value(&request).unwrap()).unwrap();

        assert_eq!(decoded.fz54, None);
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_store_card_uses_capitalized_credential() {
        let request = StoreCardRequest::new(
            "m-5",
            100,
            CardData::new("4111111111111111", 12, 2030),
            Credential::new("l", "p", "n", "mp", "tp"),
        );
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("Credential").is_some());
        assert!(value.get("credential").is_none());
    }

    #[test]
    fn test_remove_card_wire_shape() {
        let request = RemoveCardRequest::new(Credential::new("l", "p", "n", "mp", "tp"), "uid-1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["card"], json!({"uid": "uid-1"}));
        assert_eq!(value["credential"]["merchant_name"], json!("n"));
    }

    #[test]
    fn test_block_response_with_3ds() {
        let response: BlockResponse = serde_json::from_value(json!({
            "Success": true,
            "OrderId": "ord-3",
            "Amount": 1000,
            "ACSUrl": "https://acs.bank.example/challenge",
            "PaReq": "eJx...",
            "ThreeDSKey": "tds-1",
            "Is3DSVer1": true
        }))
        .unwrap();

        assert!(response.requires_3ds());
        assert!(response.is_3ds_ver1);
        assert_eq!(response.three_ds_key, "tds-1");
    }

    #[test]
    fn test_state_response_is_lenient() {
        let response: OrderStateResponse = serde_json::from_value(json!({
            "Success": true,
            "OrderId": "ord-4",
            "State": "Settling",
            "FeePercent": null,
            "SomethingNew": {"nested": 1}
        }))
        .unwrap();

        assert_eq!(response.state, OrderState::Other("Settling".into()));
        assert_eq!(response.fee_percent, None);
        assert_eq!(response.amount, 0);
        assert!(response.pan_mask.is_empty());
    }

    #[test]
    fn test_state_response_fee_percent() {
        let response: OrderStateResponse = serde_json::from_value(json!({
            "Success": true,
            "State": "Charged",
            "FeePercent": 2.5
        }))
        .unwrap();

        assert_eq!(response.state, OrderState::Charged);
        assert_eq!(response.fee_percent, Some(2.5));
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let response: OrderStateResponse = serde_json::from_value(json!({
            "Success": true,
            "OrderId": "ord-9",
            "Amount": null,
            "State": null,
            "CardType": null,
            "PanMask": null,
            "FeePercent": null
        }))
        .unwrap();

        assert_eq!(response.order_id, "ord-9");
        assert_eq!(response.amount, 0);
        assert_eq!(response.state, OrderState::default());
        assert!(response.card_type.is_empty());
        assert!(response.pan_mask.is_empty());
        assert_eq!(response.fee_percent, None);

        let response: BlockResponse = serde_json::from_value(json!({
            "Success": true,
            "OrderId": "ord-9",
            "ACSUrl": null,
            "Is3DSVer1": null
        }))
        .unwrap();
        assert!(!response.requires_3ds());
    }
}
