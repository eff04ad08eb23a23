use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AmwalPayConfig, ConfigProvider};
use crate::core::timestamp::{merchant_reference, order_id_from_reference};
use crate::core::traits::AuditLog;
use crate::core::{AppError, Result};
use crate::modules::gateways::services::{
    CallbackDecision, CallbackParams, CallbackVerifier, Language, PaymentRequest, RequestSigner,
};
use crate::modules::gateways::{GatewayEnvironment, GATEWAY_LABEL};
use crate::modules::orders::{Order, OrderGateway, PaymentState};

pub const PAYMENT_APPROVED_MESSAGE: &str = "AmwalPay : Payment Approved";
pub const PAYMENT_NOT_COMPLETED_MESSAGE: &str = "AmwalPay : Payment is not completed";

/// Everything the checkout page needs to open the SmartBox
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartBoxRequest {
    /// Serialized SmartBox payload, passed verbatim to `SmartBox.Checkout`
    pub json_data: String,
    /// SmartBox script for the configured environment
    pub url: String,
    pub callback_url: String,
}

/// Host page the customer is sent to after the callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum CheckoutRedirect {
    Return {
        order_id: String,
        transaction_id: Option<String>,
    },
    Cancel {
        order_id: String,
    },
}

impl CheckoutRedirect {
    pub fn message(&self) -> &'static str {
        match self {
            CheckoutRedirect::Return { .. } => PAYMENT_APPROVED_MESSAGE,
            CheckoutRedirect::Cancel { .. } => PAYMENT_NOT_COMPLETED_MESSAGE,
        }
    }
}

/// Result of processing one gateway callback
#[derive(Debug, Clone, Serialize)]
pub struct CallbackOutcome {
    pub order_id: String,
    pub decision: CallbackDecision,
    pub redirect: CheckoutRedirect,
}

/// Drives signing and verification against the host's orders
pub struct CheckoutService {
    orders: Arc<dyn OrderGateway>,
    audit: Arc<dyn AuditLog>,
    signer: RequestSigner,
    verifier: CallbackVerifier,
    environment: GatewayEnvironment,
    callback_url: String,
}

impl CheckoutService {
    pub fn new(
        signer: RequestSigner,
        verifier: CallbackVerifier,
        environment: GatewayEnvironment,
        callback_url: impl Into<String>,
        orders: Arc<dyn OrderGateway>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            orders,
            audit,
            signer,
            verifier,
            environment,
            callback_url: callback_url.into(),
        }
    }

    /// Build from merchant configuration; fails fast on unusable credentials
    pub fn from_config(
        config: &AmwalPayConfig,
        callback_url: impl Into<String>,
        orders: Arc<dyn OrderGateway>,
        audit: Arc<dyn AuditLog>,
    ) -> Result<Self> {
        let credentials = config.credentials()?;
        let signer = RequestSigner::new(credentials.clone())
            .with_request_source(config.request_source.clone());
        let verifier = CallbackVerifier::new(credentials).with_rule(config.approval_rule);

        Ok(Self::new(
            signer,
            verifier,
            config.environment(),
            callback_url,
            orders,
            audit,
        ))
    }

    async fn load_gateway_order(&self, order_id: &str) -> Result<Order> {
        let order = self
            .orders
            .load(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invalid order ID {}", order_id)))?;

        if order.payment_gateway != GATEWAY_LABEL {
            warn!(
                order_id,
                payment_gateway = %order.payment_gateway,
                "Order is not assigned to AmwalPay"
            );
            return Err(AppError::validation("Ops, you are accessing wrong data."));
        }

        Ok(order)
    }

    /// Sign a SmartBox request for an order at time `now`
    pub async fn start_checkout(&self, order_id: &str, now: DateTime<Utc>) -> Result<SmartBoxRequest> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(AppError::validation("Order ID not found."));
        }

        let order = self.load_gateway_order(order_id).await?;
        let amount = self.orders.total_amount(order_id).await?;

        let request = PaymentRequest {
            amount,
            currency: order.currency,
            merchant_reference: merchant_reference(order_id, now),
            timestamp: now,
            language: Language::from_locale(&order.locale),
        };

        let signed = self.signer.build_signed_request(&request)?;
        let json_data = serde_json::to_string(&signed.payload)?;

        let smartbox = SmartBoxRequest {
            json_data,
            url: self.environment.smartbox_url().to_string(),
            callback_url: self.callback_url.clone(),
        };

        self.audit.log(
            "payment_request",
            json!({
                "order_id": order_id,
                "payload": signed.payload,
                "url": smartbox.url,
                "callback_url": smartbox.callback_url,
            }),
        );

        info!(
            order_id,
            merchant_reference = %request.merchant_reference,
            environment = %self.environment,
            "AmwalPay checkout started"
        );

        Ok(smartbox)
    }

    /// Verify a callback and move the order out of `pending`.
    ///
    /// An order that already left `pending` keeps its state; the decision is
    /// still reported so the customer lands on the right page.
    pub async fn handle_callback(&self, params: &CallbackParams) -> Result<CallbackOutcome> {
        let reference = params.merchant_reference.as_deref().unwrap_or("").trim();
        let order_id = order_id_from_reference(reference)
            .ok_or_else(|| AppError::validation("Order ID not found."))?
            .to_string();

        let order = self.load_gateway_order(&order_id).await?;

        self.audit.log(
            "callback_response",
            json!({
                "order_id": order_id,
                "merchant_reference": params.merchant_reference,
                "amount": params.amount,
                "currency_id": params.currency_id,
                "customer_id": params.customer_id,
                "customer_token_id": params.customer_token_id,
                "response_code": params.response_code,
                "transaction_id": params.transaction_id,
                "transaction_time": params.transaction_time,
            }),
        );

        let decision = self.verifier.verify(params);

        self.audit.log(
            "hash_comparison",
            json!({
                "supplied_hash": decision.supplied_hash,
                "expected_hash": decision.expected_hash,
                "basis": decision.basis,
            }),
        );

        let state = if decision.approved {
            PaymentState::Completed
        } else {
            PaymentState::Canceled
        };

        let moved = self
            .orders
            .set_payment_state(
                &order_id,
                PaymentState::Pending,
                state,
                decision.transaction_id.as_deref(),
            )
            .await?;
        if !moved {
            warn!(
                order_id = %order_id,
                loaded = %order.payment_state,
                "Ignoring callback for order that is no longer pending"
            );
        }

        let redirect = if decision.approved {
            CheckoutRedirect::Return {
                order_id: order_id.clone(),
                transaction_id: decision.transaction_id.clone(),
            }
        } else {
            CheckoutRedirect::Cancel {
                order_id: order_id.clone(),
            }
        };

        self.audit.log(
            "callback_decision",
            json!({
                "order_id": order_id,
                "approved": decision.approved,
                "message": redirect.message(),
            }),
        );

        info!(
            order_id = %order_id,
            approved = decision.approved,
            "{}",
            redirect.message()
        );

        Ok(CallbackOutcome {
            order_id,
            decision,
            redirect,
        })
    }
}
