use std::env;
use std::fmt;

use crate::core::{AppError, Result};
use crate::modules::gateways::services::{ApprovalRule, DEFAULT_REQUEST_SOURCE};
use crate::modules::gateways::{GatewayEnvironment, MerchantCredentials};

/// Read-only merchant settings the gateway integration needs
pub trait ConfigProvider: Send + Sync {
    fn merchant_id(&self) -> &str;
    fn terminal_id(&self) -> &str;
    fn secret_key(&self) -> &str;
    fn environment(&self) -> GatewayEnvironment;
    fn debug(&self) -> bool;

    /// Validated credentials; fails on any empty id or an unusable key
    fn credentials(&self) -> Result<MerchantCredentials> {
        MerchantCredentials::new(self.merchant_id(), self.terminal_id(), self.secret_key())
    }
}

/// AmwalPay merchant configuration
#[derive(Clone)]
pub struct AmwalPayConfig {
    pub environment: GatewayEnvironment,
    pub merchant_id: String,
    pub terminal_id: String,
    pub secret_key: String,
    /// Emit audit logs for requests and callbacks
    pub debug: bool,
    pub approval_rule: ApprovalRule,
    pub request_source: String,
}

impl AmwalPayConfig {
    pub fn from_env() -> Result<Self> {
        let environment = env::var("AMWALPAY_ENVIRONMENT")
            .unwrap_or_else(|_| "uat".to_string())
            .parse()?;

        let strict = parse_flag("AMWALPAY_STRICT_CALLBACK", false)?;

        Ok(Self {
            environment,
            merchant_id: env::var("AMWALPAY_MERCHANT_ID").map_err(|_| {
                AppError::Configuration("AMWALPAY_MERCHANT_ID not set".to_string())
            })?,
            terminal_id: env::var("AMWALPAY_TERMINAL_ID").map_err(|_| {
                AppError::Configuration("AMWALPAY_TERMINAL_ID not set".to_string())
            })?,
            secret_key: env::var("AMWALPAY_SECRET_KEY").map_err(|_| {
                AppError::Configuration("AMWALPAY_SECRET_KEY not set".to_string())
            })?,
            debug: parse_flag("AMWALPAY_DEBUG", true)?,
            approval_rule: if strict {
                ApprovalRule::CodeAndHash
            } else {
                ApprovalRule::CodeOrHash
            },
            request_source: env::var("AMWALPAY_REQUEST_SOURCE")
                .unwrap_or_else(|_| DEFAULT_REQUEST_SOURCE.to_string()),
        })
    }
}

impl ConfigProvider for AmwalPayConfig {
    fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    fn terminal_id(&self) -> &str {
        &self.terminal_id
    }

    fn secret_key(&self) -> &str {
        &self.secret_key
    }

    fn environment(&self) -> GatewayEnvironment {
        self.environment
    }

    fn debug(&self) -> bool {
        self.debug
    }
}

impl fmt::Debug for AmwalPayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmwalPayConfig")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("terminal_id", &self.terminal_id)
            .field("secret_key", &"**redacted**")
            .field("debug", &self.debug)
            .field("approval_rule", &self.approval_rule)
            .field("request_source", &self.request_source)
            .finish()
    }
}

/// Accepts `1/0`, `true/false`, `yes/no`
pub(crate) fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(AppError::Configuration(format!("Invalid {}", name))),
        },
    }
}
