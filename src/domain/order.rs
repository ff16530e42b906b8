use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a free-form value does not name a known enum variant.
///
/// Query-string and payload values must go through [`FromStr`] before any
/// business logic sees them; there is no lenient fallback variant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unrecognized {field}: {value}")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Verified,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// DELIVERED and CANCELLED admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Cancellation is only reachable before fulfillment starts.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Verified)
    }

    /// The monotonic chain PENDING -> VERIFIED -> SHIPPING -> DELIVERED,
    /// plus the two cancel edges out of PENDING and VERIFIED.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Verified)
                | (Self::Verified, Self::Shipping)
                | (Self::Shipping, Self::Delivered)
        ) || (next == Self::Cancelled && self.is_cancellable())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Shipping => "SHIPPING",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "VERIFIED" => Ok(Self::Verified),
            "SHIPPING" => Ok(Self::Shipping),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(UnknownValue {
                field: "order status",
                value: other.to_string(),
            }),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Bank,
    Cash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bank => "BANK",
            Self::Cash => "CASH",
        })
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BANK" => Ok(Self::Bank),
            "CASH" => Ok(Self::Cash),
            other => Err(UnknownValue {
                field: "payment method",
                value: other.to_string(),
            }),
        }
    }
}

/// Settlement state of the payment, tracked independently of the order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        })
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(UnknownValue {
                field: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    Shipping,
    Pickup,
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shipping => "SHIPPING",
            Self::Pickup => "PICKUP",
        })
    }
}

impl FromStr for DeliveryMethod {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHIPPING" => Ok(Self::Shipping),
            "PICKUP" => Ok(Self::Pickup),
            other => Err(UnknownValue {
                field: "delivery method",
                value: other.to_string(),
            }),
        }
    }
}

/// A cart line as requested by the customer, before prices are captured.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// One line of a persisted order.
///
/// `unit_price_at_purchase` is captured by the ledger at reservation time and
/// never changes afterwards, regardless of later catalog price edits. Line
/// items are created once with their parent order and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_at_purchase: Decimal,
}

impl OrderLineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price_at_purchase * Decimal::from(self.quantity)
    }
}

/// A customer order with its immutable set of line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub line_items: Vec<OrderLineItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_method: DeliveryMethod,
    /// Set when the order enters SHIPPING and an eligible shipper exists.
    pub shipper_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload handed to the order store after the ledger has reserved
/// stock and captured unit prices.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: String,
    pub line_items: Vec<OrderLineItem>,
    pub payment_method: PaymentMethod,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_method: DeliveryMethod,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// A checkout request as submitted by the storefront.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub lines: Vec<OrderLineRequest>,
    pub payment_method: PaymentMethod,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_method: DeliveryMethod,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Admin-side partial update of an order.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_method: Option<DeliveryMethod>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Admin listing filter. All criteria are conjunctive; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub min_total: Option<Decimal>,
    pub max_total: Option<Decimal>,
    pub user_id_contains: Option<String>,
    pub order_id_contains: Option<String>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(payment_status) = self.payment_status {
            if order.payment_status != payment_status {
                return false;
            }
        }
        if let Some(from) = self.created_from {
            if order.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_to {
            if order.created_at > to {
                return false;
            }
        }
        if let Some(min) = self.min_total {
            if order.total_amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_total {
            if order.total_amount > max {
                return false;
            }
        }
        if let Some(needle) = &self.user_id_contains {
            if !order.user_id.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.order_id_contains {
            if !order.id.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_chain_is_monotonic() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Verified));
        assert!(Verified.can_transition_to(Shipping));
        assert!(Shipping.can_transition_to(Delivered));

        assert!(!Verified.can_transition_to(Pending));
        assert!(!Shipping.can_transition_to(Verified));
        assert!(!Pending.can_transition_to(Shipping));
        assert!(!Pending.can_transition_to(Delivered));
    }

    #[test]
    fn cancel_is_only_reachable_before_fulfillment() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Verified.can_transition_to(Cancelled));
        assert!(!Shipping.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_statuses_admit_no_transition() {
        use OrderStatus::*;
        for next in [Pending, Verified, Shipping, Delivered, Cancelled] {
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Shipping.is_terminal());
    }

    #[test]
    fn enums_parse_strictly() {
        assert_eq!("SHIPPING".parse::<OrderStatus>(), Ok(OrderStatus::Shipping));
        assert_eq!("PICKUP".parse::<DeliveryMethod>(), Ok(DeliveryMethod::Pickup));
        assert_eq!("BANK".parse::<PaymentMethod>(), Ok(PaymentMethod::Bank));
        assert_eq!("FAILED".parse::<PaymentStatus>(), Ok(PaymentStatus::Failed));

        // Lowercase and unknown values are rejected, not coerced.
        assert!("shipping".parse::<OrderStatus>().is_err());
        assert!("REFUNDED".parse::<OrderStatus>().is_err());
        let err = "DRONE".parse::<DeliveryMethod>().unwrap_err();
        assert_eq!(err.value, "DRONE");
    }

    #[test]
    fn line_total_uses_captured_price() {
        let line = OrderLineItem {
            product_id: "product_1".to_string(),
            product_name: "Red Rose Bouquet".to_string(),
            quantity: 3,
            unit_price_at_purchase: Decimal::new(2550, 2),
        };
        assert_eq!(line.line_total(), Decimal::new(7650, 2));
    }
}
