use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Currency;

/// Payment state of an order as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Awaiting the gateway callback
    #[default]
    Pending,

    /// Callback approved
    Completed,

    /// Callback declined or customer abandoned the SmartBox
    Canceled,
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentState::Pending => write!(f, "pending"),
            PaymentState::Completed => write!(f, "completed"),
            PaymentState::Canceled => write!(f, "canceled"),
        }
    }
}

/// Payment recorded against an order once the gateway reports back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub state: PaymentState,
    pub amount: Decimal,
    /// Gateway `transactionId`
    pub remote_id: Option<String>,
}

/// The slice of a host order this integration reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub total: Decimal,
    pub currency: Currency,
    /// Store language, e.g. `en` or `ar`
    pub locale: String,
    /// Label of the payment gateway the order was placed with
    pub payment_gateway: String,
    #[serde(default)]
    pub payment_state: PaymentState,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        total: Decimal,
        currency: Currency,
        locale: impl Into<String>,
        payment_gateway: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            total,
            currency,
            locale: locale.into(),
            payment_gateway: payment_gateway.into(),
            payment_state: PaymentState::Pending,
            payments: Vec::new(),
        }
    }
}
