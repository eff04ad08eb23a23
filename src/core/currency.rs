use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{AppError, Result};

/// Currencies accepted by the AmwalPay gateway with their decimal precision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Omani Rial (3 decimal places, 1000 baisa)
    OMR,
}

impl Currency {
    /// Numeric currency id the gateway expects in `CurrencyId`
    pub fn gateway_id(&self) -> u16 {
        match self {
            Currency::OMR => 512,
        }
    }

    /// Returns the decimal scale for this currency
    pub fn scale(&self) -> u32 {
        match self {
            Currency::OMR => 3,
        }
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.scale(), RoundingStrategy::MidpointAwayFromZero)
    }

    /// Formats an amount exactly as it is signed and sent as `AmountTrxn`.
    ///
    /// Always carries the full currency scale and no grouping separators,
    /// e.g. `10.5` OMR becomes `"10.500"`. Negative amounts are rejected.
    pub fn format_for_gateway(&self, amount: Decimal) -> Result<String> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AppError::validation(format!(
                "{} amount cannot be negative",
                self
            )));
        }

        let mut rounded = self.round(amount);
        rounded.rescale(self.scale());
        Ok(rounded.to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::OMR => write!(f, "OMR"),
        }
    }
}
