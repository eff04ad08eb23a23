// Shared fixtures for unit and integration tests.
//
// Golden values come from the gateway's HMAC-SHA256 scheme computed
// independently of this crate.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use amwalpay::checkout::CheckoutService;
use amwalpay::config::CheckoutConfig;
use amwalpay::core::traits::AuditLog;
use amwalpay::core::Currency;
use amwalpay::gateways::{
    ApprovalRule, CallbackParams, CallbackVerifier, GatewayEnvironment, MerchantCredentials,
    RequestSigner,
};
use amwalpay::orders::{InMemoryOrderGateway, Order};
use rust_decimal_macros::dec;
use serde_json::Value;

pub const MERCHANT_ID: &str = "100045";
pub const TERMINAL_ID: &str = "10045001";
pub const SECRET_KEY: &str = "abc123";
pub const REFERENCE: &str = "1001_250101";
pub const TRX_DATETIME: &str = "20250101120000";

pub const GOLDEN_REQUEST_STRING: &str = "Amount=10.500&CurrencyId=512&MerchantId=100045\
&MerchantReference=1001_250101&RequestDateTime=20250101120000&SessionToken=&TerminalId=10045001";
pub const GOLDEN_REQUEST_HASH: &str =
    "0967273C39A37635ED0D3FA794F6A77A90783661A055BDD9D8D9A6D9F34ED77A";

/// Callback for REFERENCE with transactionId TX123 and responseCode 00
pub const GOLDEN_CALLBACK_HASH: &str =
    "43EAED8EDBE8322EFD65E7D6D663BBD36C04E507BEF9203A736383EA62E9AE83";
/// Same callback with responseCode 51
pub const GOLDEN_DECLINED_CALLBACK_HASH: &str =
    "1456347126740B32C3765715AFF90976695822697BC41A671BB1B3EC99005437";

pub fn credentials() -> MerchantCredentials {
    MerchantCredentials::new(MERCHANT_ID, TERMINAL_ID, SECRET_KEY).unwrap()
}

pub fn signer() -> RequestSigner {
    RequestSigner::new(credentials())
}

pub fn verifier(rule: ApprovalRule) -> CallbackVerifier {
    CallbackVerifier::new(credentials()).with_rule(rule)
}

/// Callback echoing the golden request, without a hash
pub fn callback(response_code: &str) -> CallbackParams {
    CallbackParams {
        merchant_reference: Some(REFERENCE.to_string()),
        amount: Some("10.500".to_string()),
        currency_id: Some("512".to_string()),
        customer_id: Some("null".to_string()),
        customer_token_id: Some("null".to_string()),
        response_code: Some(response_code.to_string()),
        transaction_id: Some("TX123".to_string()),
        transaction_time: Some(TRX_DATETIME.to_string()),
        secure_hash_value: None,
    }
}

/// Attach the hash the gateway would compute for these fields
pub fn gateway_signed(mut params: CallbackParams) -> CallbackParams {
    let hash = verifier(ApprovalRule::default())
        .expected_hash(&params)
        .unwrap();
    params.secure_hash_value = Some(hash.as_str().to_string());
    params
}

/// Audit sink that keeps every event for assertions
#[derive(Default)]
pub struct RecordingAuditLog {
    pub events: Mutex<Vec<(String, Value)>>,
}

impl RecordingAuditLog {
    pub fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn rendered(&self) -> String {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, fields)| format!("{} {}", name, fields))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl AuditLog for RecordingAuditLog {
    fn log(&self, event: &str, fields: Value) {
        self.events.lock().unwrap().push((event.to_string(), fields));
    }
}

pub struct TestCheckout {
    pub service: Arc<CheckoutService>,
    pub orders: Arc<InMemoryOrderGateway>,
    pub audit: Arc<RecordingAuditLog>,
}

pub fn checkout_config() -> CheckoutConfig {
    CheckoutConfig {
        callback_url: "https://shop.example/amwalpay/callback".to_string(),
        return_url: "https://shop.example/checkout/return".to_string(),
        cancel_url: "https://shop.example/checkout/cancel".to_string(),
    }
}

/// Checkout service over an in-memory store holding order 1001 (10.5 OMR)
pub async fn test_checkout(rule: ApprovalRule) -> TestCheckout {
    let orders = Arc::new(InMemoryOrderGateway::new());
    orders
        .insert(Order::new("1001", dec!(10.5), Currency::OMR, "en", "amwalpay"))
        .await;
    orders
        .insert(Order::new("1002", dec!(2.25), Currency::OMR, "ar", "amwalpay"))
        .await;
    orders
        .insert(Order::new("3003", dec!(1), Currency::OMR, "en", "cod"))
        .await;

    let audit = Arc::new(RecordingAuditLog::default());
    let service = Arc::new(CheckoutService::new(
        signer(),
        verifier(rule),
        GatewayEnvironment::Sit,
        checkout_config().callback_url,
        orders.clone(),
        audit.clone(),
    ));

    TestCheckout {
        service,
        orders,
        audit,
    }
}
