use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;

use crate::core::{AppError, Result};
use crate::modules::gateways::models::SecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Field order of the outbound SmartBox request signature.
///
/// Gateway-defined. Reordering breaks every signature with no local error.
pub const REQUEST_SIGNING_FIELDS: [&str; 7] = [
    "Amount",
    "CurrencyId",
    "MerchantId",
    "MerchantReference",
    "RequestDateTime",
    "SessionToken",
    "TerminalId",
];

/// Field order of the callback integrity signature. Gateway-defined.
pub const CALLBACK_SIGNING_FIELDS: [&str; 10] = [
    "amount",
    "currencyId",
    "customerId",
    "customerTokenId",
    "merchantId",
    "merchantReference",
    "responseCode",
    "terminalId",
    "transactionId",
    "transactionTime",
];

/// Ordered name/value pairs that make up one signature input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    fields: Vec<(&'static str, String)>,
}

impl SigningContext {
    /// Build a context by pulling each value, in order, from `value_of`.
    ///
    /// The field list is one of the constant orderings above, so every
    /// context carries exactly the gateway's fields in the gateway's order.
    pub fn from_ordered<F>(names: &'static [&'static str], mut value_of: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let fields = names
            .iter()
            .map(|name| (*name, value_of(name)))
            .collect();
        Self { fields }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render as `name=value` pairs joined by `&`
    pub fn signed_string(&self) -> SignedString {
        let rendered = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");
        SignedString(rendered)
    }
}

/// Canonical string the secure hash is computed over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedString(String);

impl SignedString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uppercase hex HMAC-SHA256 of a [`SignedString`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SecureHash(String);

impl SecureHash {
    /// Key the HMAC with the decoded merchant secret and hash the signed string
    pub fn compute(signed: &SignedString, key: &SecretKey) -> Result<Self> {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| AppError::Computation(format!("Invalid HMAC key: {}", e)))?;
        mac.update(signed.as_str().as_bytes());
        let digest = mac.finalize().into_bytes();
        Ok(Self(hex::encode_upper(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a hash supplied by the gateway.
    ///
    /// Byte-exact: the gateway emits uppercase hex, anything else is a mismatch.
    pub fn matches(&self, supplied: &str) -> bool {
        self.0.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}

impl fmt::Display for SecureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
