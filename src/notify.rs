//! Outbound order notifications.
//!
//! Notification delivery is fire-and-forget: the lifecycle manager logs a
//! failure and moves on, it never rolls an order back.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::domain::{Order, OrderLineItem, OrderStatus};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    #[error("Failed to encode notification payload: {0}")]
    Encoding(String),
    #[error("Notification transport failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn order_placed(&self, order: &Order) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct OrderPlacedEvent<'a> {
    order_id: &'a str,
    user_id: &'a str,
    status: OrderStatus,
    total_amount: Decimal,
    line_items: &'a [OrderLineItem],
}

/// Emits the notification payload onto the log stream. Stands in for the
/// hosted email provider, which is an opaque collaborator here.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl NotificationSender for LoggingNotifier {
    async fn order_placed(&self, order: &Order) -> Result<(), NotifyError> {
        let event = OrderPlacedEvent {
            order_id: &order.id,
            user_id: &order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            line_items: &order.line_items,
        };
        let payload =
            serde_json::to_string(&event).map_err(|e| NotifyError::Encoding(e.to_string()))?;
        info!(target: "bloomline::notify", %payload, "order_placed");
        Ok(())
    }
}
