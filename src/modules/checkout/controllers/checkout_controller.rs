use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::config::CheckoutConfig;
use crate::core::Result;
use crate::modules::checkout::services::{CheckoutRedirect, CheckoutService};
use crate::modules::gateways::CallbackParams;

#[derive(Debug, Deserialize)]
pub struct SmartBoxQuery {
    pub order_id: Option<String>,
}

/// Open the SmartBox for an order
/// GET /amwalpay/smartbox?order_id={id}
/// Returns the signed payload, SmartBox script URL and callback URL
pub async fn smartbox(
    query: web::Query<SmartBoxQuery>,
    service: web::Data<CheckoutService>,
) -> Result<HttpResponse> {
    let order_id = query.order_id.as_deref().unwrap_or("");
    let request = service.start_checkout(order_id, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Gateway return leg
/// GET /amwalpay/callback?merchantReference=..&secureHashValue=..
/// Redirects (302) to the host return page on approval, cancel page otherwise
pub async fn callback(
    query: web::Query<CallbackParams>,
    service: web::Data<CheckoutService>,
    checkout: web::Data<CheckoutConfig>,
) -> Result<HttpResponse> {
    let params = query.into_inner();
    let outcome = service.handle_callback(&params).await?;
    let location = redirect_url(&checkout, &outcome.redirect);

    info!(order_id = %outcome.order_id, location = %location, "Redirecting customer after callback");

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

/// Keep only characters that are safe unescaped in a query value
fn query_safe(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

fn join_query(base: &str, query: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}

/// Absolute URL of the host page for a callback outcome
pub fn redirect_url(checkout: &CheckoutConfig, redirect: &CheckoutRedirect) -> String {
    match redirect {
        CheckoutRedirect::Return {
            order_id,
            transaction_id,
        } => {
            let tid = transaction_id.as_deref().map(query_safe).unwrap_or_default();
            join_query(
                &checkout.return_url,
                &format!("order_id={}&tid={}", query_safe(order_id), tid),
            )
        }
        CheckoutRedirect::Cancel { order_id } => join_query(
            &checkout.cancel_url,
            &format!("order_id={}", query_safe(order_id)),
        ),
    }
}

/// Configure AmwalPay checkout routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/amwalpay")
            .route("/smartbox", web::get().to(smartbox))
            .route("/callback", web::get().to(callback)),
    );
}
