use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::Result;
use crate::modules::orders::models::{Order, PaymentState};

/// Host-side order access used by checkout
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Load an order, `None` when the id is unknown
    async fn load(&self, order_id: &str) -> Result<Option<Order>>;

    /// Current order total
    async fn total_amount(&self, order_id: &str) -> Result<Decimal>;

    /// Move the order from `from` to `to` and record the payment outcome.
    ///
    /// The check and the write are one atomic step: returns `Ok(false)` and
    /// leaves the order untouched when its current state is not `from`.
    async fn set_payment_state(
        &self,
        order_id: &str,
        from: PaymentState,
        to: PaymentState,
        remote_id: Option<&str>,
    ) -> Result<bool>;
}
