//! Order lifecycle states reported by the gateway

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Order state as reported in `getState`.
///
/// The gateway owns the state machine; the client only reflects what it
/// reports. A state string this client does not know is kept verbatim in
/// [`OrderState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderState {
    New,
    PreAuthorized3DS,
    Authorizing,
    Authorized,
    Voiding,
    Voided,
    Charging,
    Charged,
    Refunding,
    Refunded,
    Verifying,
    Payout,
    Paying,
    Paid,
    InProcess,
    Rejected,
    Other(String),
}

impl OrderState {
    /// Wire name of the state.
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::PreAuthorized3DS => "PreAuthorized3DS",
            Self::Authorizing => "Authorizing",
            Self::Authorized => "Authorized",
            Self::Voiding => "Voiding",
            Self::Voided => "Voided",
            Self::Charging => "Charging",
            Self::Charged => "Charged",
            Self::Refunding => "Refunding",
            Self::Refunded => "Refunded",
            Self::Verifying => "Verifying",
            Self::Payout => "Payout",
            Self::Paying => "Paying",
            Self::Paid => "Paid",
            Self::InProcess => "InProcess",
            Self::Rejected => "Rejected",
            Self::Other(s) => s,
        }
    }

    /// No further transition is expected from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Voided | Self::Refunded | Self::Paid | Self::Rejected
        )
    }

    /// Funds are held on the card and can be charged or released.
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

impl Default for OrderState {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for OrderState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "New" => Self::New,
            "PreAuthorized3DS" => Self::PreAuthorized3DS,
            "Authorizing" => Self::Authorizing,
            "Authorized" => Self::Authorized,
            "Voiding" => Self::Voiding,
            "Voided" => Self::Voided,
            "Charging" => Self::Charging,
            "Charged" => Self::Charged,
            "Refunding" => Self::Refunding,
            "Refunded" => Self::Refunded,
            "Verifying" => Self::Verifying,
            "Payout" => Self::Payout,
            "Paying" => Self::Paying,
            "Paid" => Self::Paid,
            "InProcess" => Self::InProcess,
            "Rejected" => Self::Rejected,
            _ => Self::Other(s),
        }
    }
}

impl From<OrderState> for String {
    fn from(state: OrderState) -> Self {
        match state {
            OrderState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for OrderState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_states_parse() {
        let state: OrderState = serde_json::from_str("\"PreAuthorized3DS\"").unwrap();
        assert_eq!(state, OrderState::PreAuthorized3DS);
        assert_eq!("Charged".parse::<OrderState>().unwrap(), OrderState::Charged);
    }

    #[test]
    fn test_unknown_state_is_kept() {
        let state: OrderState = serde_json::from_str("\"PartiallyRefunded\"").unwrap();
        assert_eq!(state, OrderState::Other("PartiallyRefunded".into()));
        assert_eq!(state.to_string(), "PartiallyRefunded");
        assert!(!state.is_terminal());
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            "\"PartiallyRefunded\""
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderState::Refunded.is_terminal());
        assert!(OrderState::Rejected.is_terminal());
        assert!(!OrderState::Charged.is_terminal());
        assert!(OrderState::Authorized.is_authorized());
    }
}
