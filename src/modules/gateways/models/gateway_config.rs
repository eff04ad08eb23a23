use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, Result};

/// AmwalPay deployment the merchant is registered against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    /// Live payments
    Prod,
    /// User acceptance (staging)
    #[default]
    Uat,
    /// System integration testing
    Sit,
}

impl GatewayEnvironment {
    /// SmartBox script the checkout page loads for this environment
    pub fn smartbox_url(&self) -> &'static str {
        match self {
            GatewayEnvironment::Prod => "https://checkout.amwalpg.com/js/SmartBox.js?v=1.1",
            GatewayEnvironment::Uat => "https://test.amwalpg.com:7443/js/SmartBox.js?v=1.1",
            GatewayEnvironment::Sit => "https://test.amwalpg.com:19443/js/SmartBox.js?v=1.1",
        }
    }
}

impl FromStr for GatewayEnvironment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(GatewayEnvironment::Prod),
            "uat" => Ok(GatewayEnvironment::Uat),
            "sit" => Ok(GatewayEnvironment::Sit),
            other => Err(AppError::configuration(format!(
                "Unknown AmwalPay environment '{}', expected prod, uat or sit",
                other
            ))),
        }
    }
}

impl fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayEnvironment::Prod => write!(f, "prod"),
            GatewayEnvironment::Uat => write!(f, "uat"),
            GatewayEnvironment::Sit => write!(f, "sit"),
        }
    }
}

/// Merchant secret used as the HMAC key, held as decoded bytes.
///
/// The merchant portal issues the key as a hex string; it is decoded once
/// here and never rendered back out.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let trimmed = hex_key.trim();
        if trimmed.is_empty() {
            return Err(AppError::configuration("AmwalPay secret key is empty"));
        }
        let bytes = hex::decode(trimmed).map_err(|e| {
            AppError::configuration(format!("AmwalPay secret key is not valid hex: {}", e))
        })?;
        Ok(Self(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(**redacted**)")
    }
}

/// Merchant/terminal identity plus the signing key.
///
/// Only constructible with all three values present, so an empty-keyed hash
/// can never be produced downstream.
#[derive(Debug, Clone)]
pub struct MerchantCredentials {
    merchant_id: String,
    terminal_id: String,
    secret_key: SecretKey,
}

impl MerchantCredentials {
    pub fn new(merchant_id: &str, terminal_id: &str, secret_key: &str) -> Result<Self> {
        let merchant_id = merchant_id.trim();
        let terminal_id = terminal_id.trim();

        if merchant_id.is_empty() {
            return Err(AppError::configuration("AmwalPay merchant id is empty"));
        }
        if terminal_id.is_empty() {
            return Err(AppError::configuration("AmwalPay terminal id is empty"));
        }
        let secret_key = SecretKey::from_hex(secret_key)?;

        Ok(Self {
            merchant_id: merchant_id.to_string(),
            terminal_id: terminal_id.to_string(),
            secret_key,
        })
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn terminal_id(&self) -> &str {
        &self.terminal_id
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }
}
