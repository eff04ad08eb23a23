use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

use super::signing::{SecureHash, SigningContext, CALLBACK_SIGNING_FIELDS};
use crate::core::{AppError, Result};
use crate::modules::gateways::models::MerchantCredentials;

/// Response code the gateway uses for an approved transaction
pub const APPROVED_RESPONSE_CODE: &str = "00";

/// Query parameters the gateway appends when redirecting the customer back.
///
/// Every field is optional at the type level so a partial callback still
/// deserializes and can be declined instead of rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackParams {
    pub merchant_reference: Option<String>,
    pub amount: Option<String>,
    pub currency_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_token_id: Option<String>,
    pub response_code: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction_time: Option<String>,
    pub secure_hash_value: Option<String>,
}

/// How the response code and hash check combine into approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRule {
    /// Approve when the response code is `00` OR the hash matches.
    ///
    /// Matches the deployed plugin. A forged callback carrying `00` with a
    /// wrong hash is approved under this rule.
    #[default]
    CodeOrHash,
    /// Approve only when the response code is `00` AND the hash matches
    CodeAndHash,
}

/// What the approval outcome rested on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    ResponseCodeAndHash,
    ResponseCodeOnly,
    HashOnly,
    Neither,
    Malformed(String),
}

/// Outcome of verifying one callback, with both hashes kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackDecision {
    pub approved: bool,
    pub basis: DecisionBasis,
    pub expected_hash: Option<SecureHash>,
    pub supplied_hash: Option<String>,
    pub response_code: Option<String>,
    pub transaction_id: Option<String>,
    pub merchant_reference: Option<String>,
}

impl CallbackDecision {
    fn malformed(params: &CallbackParams, reason: String) -> Self {
        Self {
            approved: false,
            basis: DecisionBasis::Malformed(reason),
            expected_hash: None,
            supplied_hash: normalized(&params.secure_hash_value),
            response_code: normalized(&params.response_code),
            transaction_id: normalized(&params.transaction_id),
            merchant_reference: normalized(&params.merchant_reference),
        }
    }
}

/// The gateway echoes unset JavaScript values as the literals `null` / `undefined`
fn normalize(value: &str) -> &str {
    match value {
        "null" | "undefined" => "",
        other => other,
    }
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(normalize)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref().map(normalize) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::malformed(format!("missing {}", name))),
    }
}

/// Recomputes callback hashes with locally held credentials and decides approval
#[derive(Debug, Clone)]
pub struct CallbackVerifier {
    credentials: MerchantCredentials,
    rule: ApprovalRule,
}

impl CallbackVerifier {
    pub fn new(credentials: MerchantCredentials) -> Self {
        Self {
            credentials,
            rule: ApprovalRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: ApprovalRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> ApprovalRule {
        self.rule
    }

    /// Callback signing context: echoed fields plus local merchant/terminal ids
    pub fn signing_context(&self, params: &CallbackParams) -> SigningContext {
        let echoed = |value: &Option<String>| normalize(value.as_deref().unwrap_or("")).to_string();

        SigningContext::from_ordered(&CALLBACK_SIGNING_FIELDS, |name| match name {
            "amount" => echoed(&params.amount),
            "currencyId" => echoed(&params.currency_id),
            "customerId" => echoed(&params.customer_id),
            "customerTokenId" => echoed(&params.customer_token_id),
            "merchantId" => self.credentials.merchant_id().to_string(),
            "merchantReference" => echoed(&params.merchant_reference),
            "responseCode" => echoed(&params.response_code),
            "terminalId" => self.credentials.terminal_id().to_string(),
            "transactionId" => echoed(&params.transaction_id),
            "transactionTime" => echoed(&params.transaction_time),
            _ => String::new(),
        })
    }

    /// Hash the gateway should have sent for these callback fields
    pub fn expected_hash(&self, params: &CallbackParams) -> Result<SecureHash> {
        let context = self.signing_context(params);
        SecureHash::compute(&context.signed_string(), self.credentials.secret_key())
    }

    fn check_structure<'a>(&self, params: &'a CallbackParams) -> Result<(&'a str, &'a str)> {
        required(&params.merchant_reference, "merchantReference")?;

        // Parsed exactly as hashed; padded values are malformed
        let amount = required(&params.amount, "amount")?;
        let amount = Decimal::from_str(amount)
            .map_err(|_| AppError::malformed(format!("non-numeric amount '{}'", amount)))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AppError::malformed("negative amount"));
        }

        let currency_id = required(&params.currency_id, "currencyId")?;
        currency_id
            .parse::<u16>()
            .map_err(|_| AppError::malformed(format!("non-numeric currencyId '{}'", currency_id)))?;

        let response_code = required(&params.response_code, "responseCode")?;
        let supplied_hash = required(&params.secure_hash_value, "secureHashValue")?;

        Ok((response_code, supplied_hash))
    }

    /// Decide whether a callback represents an approved payment.
    ///
    /// Never fails: structural problems and hash failures yield a declined
    /// decision.
    pub fn verify(&self, params: &CallbackParams) -> CallbackDecision {
        let (response_code, supplied_hash) = match self.check_structure(params) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(error = %e, "Declining malformed AmwalPay callback");
                return CallbackDecision::malformed(params, e.to_string());
            }
        };

        let expected = match self.expected_hash(params) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(error = %e, "Declining AmwalPay callback, hash computation failed");
                return CallbackDecision::malformed(params, e.to_string());
            }
        };

        let code_ok = response_code == APPROVED_RESPONSE_CODE;
        let hash_ok = expected.matches(supplied_hash);

        let approved = match self.rule {
            ApprovalRule::CodeOrHash => code_ok || hash_ok,
            ApprovalRule::CodeAndHash => code_ok && hash_ok,
        };

        let basis = match (code_ok, hash_ok) {
            (true, true) => DecisionBasis::ResponseCodeAndHash,
            (true, false) => DecisionBasis::ResponseCodeOnly,
            (false, true) => DecisionBasis::HashOnly,
            (false, false) => DecisionBasis::Neither,
        };

        if approved && !hash_ok {
            warn!(
                merchant_reference = ?params.merchant_reference,
                "AmwalPay callback approved on response code with mismatched secure hash"
            );
        }

        debug!(
            approved,
            code_ok,
            hash_ok,
            rule = ?self.rule,
            "Verified AmwalPay callback"
        );

        CallbackDecision {
            approved,
            basis,
            expected_hash: Some(expected),
            supplied_hash: Some(supplied_hash.to_string()),
            response_code: Some(response_code.to_string()),
            transaction_id: normalized(&params.transaction_id),
            merchant_reference: normalized(&params.merchant_reference),
        }
    }
}
