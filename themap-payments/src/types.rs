//! Gateway data model shared by several operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Merchant-level authentication bundle.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub login: String,
    pub password: String,
    pub merchant_name: String,
    pub merchant_password: String,
    pub terminal_password: String,
}

impl Credential {
    /// Create a credential bundle
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_password: impl Into<String>,
        terminal_password: impl Into<String>,
    ) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            merchant_name: merchant_name.into(),
            merchant_password: merchant_password.into(),
            terminal_password: terminal_password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("merchant_name", &self.merchant_name)
            .field("merchant_password", &"[REDACTED]")
            .field("terminal_password", &"[REDACTED]")
            .finish()
    }
}

/// Reference to a card previously stored with `storeCard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCard {
    /// Gateway-issued card uid
    pub uid: String,
}

impl StoredCard {
    /// Reference a stored card by uid
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

/// Raw card data.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub pan: String,
    pub emonth: u8,
    pub eyear: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}

impl CardData {
    /// Card number and expiry
    pub fn new(pan: impl Into<String>, emonth: u8, eyear: u16) -> Self {
        Self {
            pan: pan.into(),
            emonth,
            eyear,
            cvv: None,
            holder: None,
        }
    }

    /// With CVV/CVC
    pub fn cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }

    /// With cardholder name
    pub fn holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = Some(holder.into());
        self
    }

    /// PAN with everything but the last four digits hidden.
    pub fn masked_pan(&self) -> String {
        let digits: Vec<char> = self.pan.chars().collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for CardData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardData")
            .field("pan", &self.masked_pan())
            .field("emonth", &self.emonth)
            .field("eyear", &self.eyear)
            .field("cvv", &self.cvv.as_ref().map(|_| "***"))
            .field("holder", &self.holder)
            .finish()
    }
}

/// Card used for an authorization: either a stored reference or raw data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardInfo {
    Stored(StoredCard),
    Raw(CardData),
}

impl CardInfo {
    /// Card stored earlier, addressed by its gateway uid
    pub fn stored(uid: impl Into<String>) -> Self {
        Self::Stored(StoredCard::new(uid))
    }

    /// Raw card data
    pub fn raw(card: CardData) -> Self {
        Self::Raw(card)
    }
}

impl From<CardData> for CardInfo {
    fn from(card: CardData) -> Self {
        Self::Raw(card)
    }
}

impl From<StoredCard> for CardInfo {
    fn from(card: StoredCard) -> Self {
        Self::Stored(card)
    }
}

/// Kind of session opened by `Init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionType {
    /// Payment session
    #[default]
    #[serde(rename = "pay")]
    Pay,
    /// Card binding session
    #[serde(rename = "add")]
    Add,
}

/// One-step (auth + capture) or two-step (auth, then `Charge`) payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentType {
    #[default]
    OneStep,
    TwoStep,
}

/// Fiscal receipt attachment (54-FZ).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtraFz54 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque: Option<Fz54Cheque>,
    /// Receipt lines
    pub goods: Vec<Fz54Good>,
}

impl ExtraFz54 {
    /// Receipt with the given lines and no cheque attributes
    pub fn new(goods: Vec<Fz54Good>) -> Self {
        Self {
            cheque: None,
            goods,
        }
    }

    /// Set cheque-level attributes
    pub fn cheque(mut self, cheque: Fz54Cheque) -> Self {
        self.cheque = Some(cheque);
        self
    }
}

/// Cheque-level receipt attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fz54Cheque {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_attribute: Option<String>,
}

/// One receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fz54Good {
    pub name: String,
    /// Decimal price as the gateway expects it, e.g. `"150.00"`
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_subject_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Fz54Supplier>,
}

impl Fz54Good {
    /// Line with a name and a decimal price
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            tax: None,
            payment_subject_type: None,
            payment_method_type: None,
            agent_type: None,
            supplier: None,
        }
    }

    /// VAT rate code
    pub fn tax(mut self, tax: i32) -> Self {
        self.tax = Some(tax);
        self
    }

    /// Payment subject code
    pub fn payment_subject_type(mut self, value: i32) -> Self {
        self.payment_subject_type = Some(value);
        self
    }

    /// Payment method code
    pub fn payment_method_type(mut self, value: i32) -> Self {
        self.payment_method_type = Some(value);
        self
    }

    /// Agent type code
    pub fn agent_type(mut self, value: i32) -> Self {
        self.agent_type = Some(value);
        self
    }

    /// Supplier of the line, for agent sales
    pub fn supplier(mut self, supplier: Fz54Supplier) -> Self {
        self.supplier = Some(supplier);
        self
    }
}

/// Supplier details for an agent sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fz54Supplier {
    pub name: String,
    /// Taxpayer identification number
    pub inn: String,
    pub phone_numbers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stored_card_wire_shape() {
        let card = CardInfo::stored("card-42");
        assert_eq!(serde_json::to_value(&card).unwrap(), json!({"uid": "card-42"}));
    }

    #[test]
    fn test_raw_card_omits_absent_fields() {
        let card = CardInfo::raw(CardData::new("4111111111111111", 12, 2030));
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({"pan": "4111111111111111", "emonth": 12, "eyear": 2030})
        );
    }

    #[test]
    fn test_card_info_decodes_both_shapes() {
        let stored: CardInfo = serde_json::from_value(json!({"uid": "u-1"})).unwrap();
        assert_eq!(stored, CardInfo::stored("u-1"));

        let raw: CardInfo = serde_json::from_value(
            json!({"pan": "5555555555554444", "emonth": 1, "eyear": 2031, "cvv": "123"}),
        )
        .unwrap();
        assert_eq!(
            raw,
            CardInfo::raw(CardData::new("5555555555554444", 1, 2031).cvv("123"))
        );
    }

    #[test]
    fn test_debug_hides_card_secrets() {
        let card = CardData::new("4111111111111111", 12, 2030).cvv("987");
        let out = format!("{:?}", card);
        assert!(out.contains("****1111"));
        assert!(!out.contains("4111111111111111"));
        assert!(!out.contains("987"));
    }

    #[test]
    fn test_debug_hides_credential_passwords() {
        let credential = Credential::new("shop", "p1", "Shop LLC", "p2", "p3");
        let out = format!("{:?}", credential);
        assert!(out.contains("shop"));
        assert!(!out.contains("p1") && !out.contains("p2") && !out.contains("p3"));
    }

    #[test]
    fn test_session_and_payment_type_wire_names() {
        assert_eq!(serde_json::to_value(SessionType::Add).unwrap(), json!("add"));
        assert_eq!(
            serde_json::to_value(PaymentType::TwoStep).unwrap(),
            json!("TwoStep")
        );
    }

    #[test]
    fn test_good_omits_absent_codes() {
        let good = Fz54Good::new("Coffee", "150.00").tax(6);
        assert_eq!(
            serde_json::to_value(&good).unwrap(),
            json!({"name": "Coffee", "price": "150.00", "tax": 6})
        );
    }
}
