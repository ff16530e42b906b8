//! Typed mailbox messages for the bespoke actors.
//!
//! Each variant carries its parameters plus a oneshot channel for the reply.
//! A single message is the unit of atomicity: everything a handler does in
//! response to one message is visible to other callers all-or-nothing.

use tokio::sync::oneshot;

use crate::domain::{
    Order, OrderCreate, OrderFilter, OrderLineItem, OrderLineRequest, OrderStatus, OrderUpdate,
    Product, ProductCreate, ProductPatch,
};
use crate::error::{InventoryError, OrderError};

pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

#[derive(Debug)]
pub enum InventoryRequest {
    AddProduct {
        params: ProductCreate,
        respond_to: ServiceResponse<String, InventoryError>,
    },
    GetProduct {
        id: String,
        respond_to: ServiceResponse<Option<Product>, InventoryError>,
    },
    ListProducts {
        respond_to: ServiceResponse<Vec<Product>, InventoryError>,
    },
    UpdateProduct {
        id: String,
        patch: ProductPatch,
        respond_to: ServiceResponse<Product, InventoryError>,
    },
    CheckAvailability {
        product_id: String,
        quantity: u32,
        respond_to: ServiceResponse<bool, InventoryError>,
    },
    /// Atomically validates and decrements stock for every line, returning
    /// priced line items. The first failing line aborts the whole batch with
    /// no partial decrement.
    Reserve {
        lines: Vec<OrderLineRequest>,
        respond_to: ServiceResponse<Vec<OrderLineItem>, InventoryError>,
    },
    /// Puts cancelled quantities back. Lines whose product has vanished are
    /// logged and skipped; the order-status guard is what prevents a double
    /// restore, not the ledger.
    Restore {
        lines: Vec<OrderLineRequest>,
        respond_to: ServiceResponse<(), InventoryError>,
    },
}

#[derive(Debug)]
pub enum OrderStoreRequest {
    Insert {
        params: OrderCreate,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    Get {
        id: String,
        respond_to: ServiceResponse<Option<Order>, OrderError>,
    },
    List {
        filter: OrderFilter,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    /// Ownership check, cancellability check, and the status flip happen in
    /// this one message; the reply carries the cancelled order and its prior
    /// status, so the caller can hand the lines back to the ledger exactly
    /// once, or reinstate the order if that hand-off fails.
    Cancel {
        id: String,
        requesting_user_id: String,
        respond_to: ServiceResponse<(Order, OrderStatus), OrderError>,
    },
    /// Compensation for a restore that could not be delivered after a
    /// cancel: puts the CANCELLED order back into its prior status so the
    /// flip and the ledger never disagree.
    Reinstate {
        id: String,
        status: OrderStatus,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    /// Admin-side field update with state-machine validation. When the net
    /// effect is VERIFIED -> SHIPPING, `candidates` holds the verified
    /// shipper ids and the actor runs the assignment policy over fresh
    /// active-shipping counts in the same write.
    ApplyUpdate {
        id: String,
        update: OrderUpdate,
        candidates: Option<Vec<String>>,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    /// Shipper-initiated SHIPPING -> DELIVERED on their own order.
    MarkDelivered {
        id: String,
        shipper_id: String,
        respond_to: ServiceResponse<Order, OrderError>,
    },
}
