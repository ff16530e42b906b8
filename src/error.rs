use crate::actor_framework::FrameworkError;
use crate::domain::{OrderStatus, UnknownValue};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the inventory ledger.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

/// Errors raised by the order lifecycle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid order state transition: {from} -> {to}")]
    InvalidState { from: OrderStatus, to: OrderStatus },
    #[error("Order validation error: {0}")]
    Validation(String),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<InventoryError> for OrderError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(id) => OrderError::ProductNotFound(id),
            InventoryError::InsufficientStock {
                product_id,
                requested,
                available,
            } => OrderError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            InventoryError::InvalidQuantity(q) => {
                OrderError::Validation(format!("invalid line quantity: {q}"))
            }
            InventoryError::InvalidPrice(p) => {
                OrderError::Validation(format!("invalid price: {p}"))
            }
            InventoryError::ActorCommunication(msg) => OrderError::ActorCommunication(msg),
        }
    }
}

impl From<UnknownValue> for OrderError {
    fn from(err: UnknownValue) -> Self {
        OrderError::Validation(err.to_string())
    }
}

/// Errors raised by the shipper registry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShipperError {
    #[error("Shipper not found: {0}")]
    NotFound(String),
    #[error("Shipper registry rejected request: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<FrameworkError> for ShipperError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => ShipperError::NotFound(id),
            FrameworkError::Rejected(msg) => ShipperError::Rejected(msg),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                ShipperError::ActorCommunication(err.to_string())
            }
        }
    }
}
