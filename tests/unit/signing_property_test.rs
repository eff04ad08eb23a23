// Property tests for request signing and callback verification
//
// - Signing is deterministic
// - Any single field change changes the hash, for every field of both the
//   request and the callback signing contexts
// - A signed request echoed back in a callback verifies

#[path = "../helpers/mod.rs"]
mod helpers;

use amwalpay::core::Currency;
use amwalpay::gateways::services::{
    SigningContext, CALLBACK_SIGNING_FIELDS, REQUEST_SIGNING_FIELDS,
};
use amwalpay::gateways::{
    ApprovalRule, CallbackParams, Language, PaymentRequest, SecretKey, SecureHash,
};
use chrono::{TimeZone, Utc};
use helpers::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn request(baisa: u64, reference: &str, secs: i64) -> PaymentRequest {
    PaymentRequest {
        amount: Decimal::new(baisa as i64, 3),
        currency: Currency::OMR,
        merchant_reference: reference.to_string(),
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        language: Language::En,
    }
}

/// Mutable slot of the callback field with this signing name, `None` for
/// the fields taken from local credentials
fn echoed_field<'a>(params: &'a mut CallbackParams, name: &str) -> Option<&'a mut Option<String>> {
    match name {
        "amount" => Some(&mut params.amount),
        "currencyId" => Some(&mut params.currency_id),
        "customerId" => Some(&mut params.customer_id),
        "customerTokenId" => Some(&mut params.customer_token_id),
        "merchantReference" => Some(&mut params.merchant_reference),
        "responseCode" => Some(&mut params.response_code),
        "transactionId" => Some(&mut params.transaction_id),
        "transactionTime" => Some(&mut params.transaction_time),
        _ => None,
    }
}

fn hash_of(context: &SigningContext) -> SecureHash {
    let key = SecretKey::from_hex(SECRET_KEY).unwrap();
    SecureHash::compute(&context.signed_string(), &key).unwrap()
}

proptest! {
    #[test]
    fn test_every_request_field_changes_hash(
        index in 0usize..REQUEST_SIGNING_FIELDS.len(),
        extra in "[A-Za-z0-9]{1,12}",
    ) {
        let base = signer().signing_context("10.500", 512, REFERENCE, TRX_DATETIME);
        let target = REQUEST_SIGNING_FIELDS[index];
        let changed = SigningContext::from_ordered(&REQUEST_SIGNING_FIELDS, |name| {
            let value = base.value(name).unwrap_or_default().to_string();
            if name == target {
                value + &extra
            } else {
                value
            }
        });

        let base_hash = hash_of(&base);
        prop_assert_eq!(base_hash.as_str(), GOLDEN_REQUEST_HASH);
        prop_assert_ne!(hash_of(&base), hash_of(&changed));
    }

    #[test]
    fn test_every_callback_field_changes_hash(
        index in 0usize..CALLBACK_SIGNING_FIELDS.len(),
        replacement in "[A-Za-z0-9]{1,12}",
    ) {
        prop_assume!(replacement != "null" && replacement != "undefined");
        let target = CALLBACK_SIGNING_FIELDS[index];
        let original = callback("00");
        let base = verifier(ApprovalRule::CodeAndHash).expected_hash(&original).unwrap();
        prop_assert_eq!(base.as_str(), GOLDEN_CALLBACK_HASH);

        let mut params = original.clone();
        let changed = match echoed_field(&mut params, target) {
            // Echoed by the gateway: replace the value in the callback
            Some(slot) => {
                prop_assume!(slot.as_deref() != Some(replacement.as_str()));
                *slot = Some(replacement.clone());
                verifier(ApprovalRule::CodeAndHash).expected_hash(&params).unwrap()
            }
            // Merchant or terminal id: the verifier signs with its own credentials
            None => {
                let context = verifier(ApprovalRule::CodeAndHash).signing_context(&original);
                let changed = SigningContext::from_ordered(&CALLBACK_SIGNING_FIELDS, |name| {
                    let value = context.value(name).unwrap_or_default().to_string();
                    if name == target {
                        value + &replacement
                    } else {
                        value
                    }
                });
                hash_of(&changed)
            }
        };

        prop_assert_ne!(base, changed);
    }

    #[test]
    fn test_signing_is_deterministic(
        baisa in 0u64..10_000_000_000u64,
        order_id in 1u32..1_000_000u32,
        secs in 1_600_000_000i64..2_000_000_000i64,
    ) {
        let reference = format!("{}_250101120000000", order_id);
        let first = signer().build_signed_request(&request(baisa, &reference, secs)).unwrap();
        let second = signer().build_signed_request(&request(baisa, &reference, secs)).unwrap();

        prop_assert_eq!(first.secure_hash, second.secure_hash);
        prop_assert_eq!(first.payload, second.payload);
    }

    #[test]
    fn test_amount_change_changes_hash(
        baisa in 0u64..10_000_000_000u64,
        delta in 1u64..1_000_000u64,
    ) {
        let a = signer().build_signed_request(&request(baisa, REFERENCE, 1_735_732_800)).unwrap();
        let b = signer().build_signed_request(&request(baisa + delta, REFERENCE, 1_735_732_800)).unwrap();
        prop_assert_ne!(a.secure_hash, b.secure_hash);
    }

    #[test]
    fn test_reference_change_changes_hash(
        left in 1u32..1_000_000u32,
        right in 1u32..1_000_000u32,
    ) {
        prop_assume!(left != right);
        let a = signer().sign_fields("10.500", 512, &format!("{}_250101120000000", left), TRX_DATETIME).unwrap();
        let b = signer().sign_fields("10.500", 512, &format!("{}_250101120000000", right), TRX_DATETIME).unwrap();
        prop_assert_ne!(a.1, b.1);
    }

    #[test]
    fn test_echoed_request_verifies(
        baisa in 0u64..10_000_000_000u64,
        order_id in 1u32..1_000_000u32,
        transaction_id in "[A-Z0-9]{6,20}",
    ) {
        let reference = format!("{}_250101120000000", order_id);
        let signed = signer().build_signed_request(&request(baisa, &reference, 1_735_732_800)).unwrap();

        let params = gateway_signed(CallbackParams {
            merchant_reference: Some(signed.payload.merchant_reference.clone()),
            amount: Some(signed.payload.amount_trxn.clone()),
            currency_id: Some(signed.payload.currency_id.to_string()),
            response_code: Some("00".to_string()),
            transaction_id: Some(transaction_id),
            transaction_time: Some(signed.payload.trx_date_time.clone()),
            ..CallbackParams::default()
        });

        let decision = verifier(ApprovalRule::CodeAndHash).verify(&params);
        prop_assert!(decision.approved);
    }

    #[test]
    fn test_tampered_amount_with_decline_code_rejected(
        baisa in 1u64..10_000_000_000u64,
        response_code in "(0[1-9]|[1-9][0-9])",
    ) {
        let mut params = gateway_signed(callback(&response_code));
        params.amount = Some(Decimal::new(baisa as i64, 3).to_string());
        prop_assume!(params.amount.as_deref() != Some("10.500"));

        let decision = verifier(ApprovalRule::CodeOrHash).verify(&params);
        prop_assert!(!decision.approved);
    }
}
