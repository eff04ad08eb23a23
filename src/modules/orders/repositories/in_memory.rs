use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use super::order_gateway::OrderGateway;
use crate::core::{AppError, Result};
use crate::modules::orders::models::{Order, PaymentRecord, PaymentState};

/// Order store kept in process memory.
///
/// Stands in for the host commerce platform when running the service
/// standalone and in tests.
#[derive(Debug, Default)]
pub struct InMemoryOrderGateway {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryOrderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id.clone(), order);
    }
}

#[async_trait]
impl OrderGateway for InMemoryOrderGateway {
    async fn load(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(order_id).cloned())
    }

    async fn total_amount(&self, order_id: &str) -> Result<Decimal> {
        self.orders
            .read()
            .await
            .get(order_id)
            .map(|order| order.total)
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))
    }

    async fn set_payment_state(
        &self,
        order_id: &str,
        from: PaymentState,
        to: PaymentState,
        remote_id: Option<&str>,
    ) -> Result<bool> {
        // Held across the check and the write
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;

        if order.payment_state != from {
            return Ok(false);
        }

        order.payment_state = to;
        // Declines only change state; a payment record exists for approvals
        if to == PaymentState::Completed {
            order.payments.push(PaymentRecord {
                state: to,
                amount: order.total,
                remote_id: remote_id.map(str::to_string),
            });
        }

        info!(order_id, state = %to, remote_id = ?remote_id, "Order payment state updated");
        Ok(true)
    }
}
