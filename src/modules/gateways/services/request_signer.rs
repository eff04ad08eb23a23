use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::signing::{SecureHash, SigningContext, REQUEST_SIGNING_FIELDS};
use crate::core::timestamp::GatewayTimestamp;
use crate::core::{AppError, Currency, Result};
use crate::modules::gateways::models::MerchantCredentials;

/// `RequestSource` reported to the gateway unless configured otherwise
pub const DEFAULT_REQUEST_SOURCE: &str = "Checkout_Rust";

/// SmartBox renders the payment form embedded in the page
const PAYMENT_VIEW_TYPE_EMBEDDED: u8 = 1;

/// SmartBox display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Language {
    /// English for any locale containing `en`, Arabic otherwise
    pub fn from_locale(locale: &str) -> Self {
        if locale.to_ascii_lowercase().contains("en") {
            Language::En
        } else {
            Language::Ar
        }
    }
}

/// One checkout attempt to be signed
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Order total
    pub amount: Decimal,

    pub currency: Currency,

    /// `{order_id}_{yymmddHHMMSSmmm}`, echoed back in the callback
    pub merchant_reference: String,

    /// Request time, rendered as `TrxDateTime`
    pub timestamp: DateTime<Utc>,

    pub language: Language,
}

/// Payload handed to the SmartBox script, field names per the gateway contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartBoxPayload {
    #[serde(rename = "AmountTrxn")]
    pub amount_trxn: String,

    #[serde(rename = "MerchantReference")]
    pub merchant_reference: String,

    #[serde(rename = "MID")]
    pub mid: String,

    #[serde(rename = "TID")]
    pub tid: String,

    #[serde(rename = "CurrencyId")]
    pub currency_id: u16,

    #[serde(rename = "LanguageId")]
    pub language_id: Language,

    #[serde(rename = "SecureHash")]
    pub secure_hash: SecureHash,

    #[serde(rename = "TrxDateTime")]
    pub trx_date_time: String,

    #[serde(rename = "PaymentViewType")]
    pub payment_view_type: u8,

    #[serde(rename = "RequestSource")]
    pub request_source: String,

    #[serde(rename = "SessionToken")]
    pub session_token: String,
}

/// Signed outbound request
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub secure_hash: SecureHash,
    pub context: SigningContext,
    pub payload: SmartBoxPayload,
}

/// Builds signed SmartBox requests for one merchant terminal
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: MerchantCredentials,
    request_source: String,
}

impl RequestSigner {
    pub fn new(credentials: MerchantCredentials) -> Self {
        Self {
            credentials,
            request_source: DEFAULT_REQUEST_SOURCE.to_string(),
        }
    }

    pub fn with_request_source(mut self, request_source: impl Into<String>) -> Self {
        self.request_source = request_source.into();
        self
    }

    pub fn credentials(&self) -> &MerchantCredentials {
        &self.credentials
    }

    /// Request signing context from already-formatted wire values
    pub fn signing_context(
        &self,
        amount: &str,
        currency_id: u16,
        merchant_reference: &str,
        trx_datetime: &str,
    ) -> SigningContext {
        SigningContext::from_ordered(&REQUEST_SIGNING_FIELDS, |name| match name {
            "Amount" => amount.to_string(),
            "CurrencyId" => currency_id.to_string(),
            "MerchantId" => self.credentials.merchant_id().to_string(),
            "MerchantReference" => merchant_reference.to_string(),
            "RequestDateTime" => trx_datetime.to_string(),
            "TerminalId" => self.credentials.terminal_id().to_string(),
            // SessionToken is always sent empty
            _ => String::new(),
        })
    }

    /// Sign already-formatted wire values
    pub fn sign_fields(
        &self,
        amount: &str,
        currency_id: u16,
        merchant_reference: &str,
        trx_datetime: &str,
    ) -> Result<(SigningContext, SecureHash)> {
        if merchant_reference.trim().is_empty() {
            return Err(AppError::validation("Merchant reference is empty"));
        }

        let context = self.signing_context(amount, currency_id, merchant_reference, trx_datetime);
        let secure_hash =
            SecureHash::compute(&context.signed_string(), self.credentials.secret_key())?;
        Ok((context, secure_hash))
    }

    /// Format, sign and assemble the SmartBox payload for one checkout attempt
    pub fn build_signed_request(&self, request: &PaymentRequest) -> Result<SignedRequest> {
        let amount = request.currency.format_for_gateway(request.amount)?;
        let currency_id = request.currency.gateway_id();
        let trx_datetime = GatewayTimestamp::trx_datetime(request.timestamp);

        let (context, secure_hash) = self.sign_fields(
            &amount,
            currency_id,
            &request.merchant_reference,
            &trx_datetime,
        )?;

        debug!(
            merchant_reference = %request.merchant_reference,
            amount = %amount,
            currency_id,
            "Signed AmwalPay SmartBox request"
        );

        let payload = SmartBoxPayload {
            amount_trxn: amount,
            merchant_reference: request.merchant_reference.clone(),
            mid: self.credentials.merchant_id().to_string(),
            tid: self.credentials.terminal_id().to_string(),
            currency_id,
            language_id: request.language,
            secure_hash: secure_hash.clone(),
            trx_date_time: trx_datetime,
            payment_view_type: PAYMENT_VIEW_TYPE_EMBEDDED,
            request_source: self.request_source.clone(),
            session_token: String::new(),
        };

        Ok(SignedRequest {
            secure_hash,
            context,
            payload,
        })
    }
}
