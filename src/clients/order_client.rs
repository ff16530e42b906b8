use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument, warn};

use crate::client_method;
use crate::clients::{InventoryClient, ShipperClient};
use crate::domain::{
    CreateOrderRequest, DeliveryMethod, Order, OrderCreate, OrderFilter, OrderLineRequest,
    OrderStatus, OrderUpdate,
};
use crate::error::OrderError;
use crate::messages::{OrderStoreRequest, ServiceResponse};
use crate::notify::NotificationSender;

/// The order lifecycle manager.
///
/// Orchestrates across the order store, the inventory ledger, and the
/// shipper registry: create validates and reserves before inserting, cancel
/// flips state before restoring, and the SHIPPING transition carries the
/// verified-shipper snapshot into the order actor's write.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderStoreRequest>,
    inventory: InventoryClient,
    shippers: ShipperClient,
    notifier: Arc<dyn NotificationSender>,
}

impl OrderClient {
    pub fn new(
        sender: mpsc::Sender<OrderStoreRequest>,
        inventory: InventoryClient,
        shippers: ShipperClient,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            sender,
            inventory,
            shippers,
            notifier,
        }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(ServiceResponse<R, OrderError>) -> OrderStoreRequest,
    ) -> Result<R, OrderError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| OrderError::ActorCommunication("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| OrderError::ActorCommunication("Actor dropped".to_string()))?
    }

    /// Creates an order from a checkout request.
    ///
    /// Stock for every line is reserved in a single ledger message, so a
    /// failure on any line leaves no decrement behind; the captured prices
    /// become the order's immutable line items. If the insert cannot reach
    /// the order store, the reservation is compensated.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        info!("Processing create_order request");

        if request.lines.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one line item".to_string(),
            ));
        }
        if request.delivery_method == DeliveryMethod::Shipping {
            let has_address = request
                .address
                .as_deref()
                .is_some_and(|a| !a.trim().is_empty());
            let has_phone = request
                .phone
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty());
            if !has_address || !has_phone {
                return Err(OrderError::Validation(
                    "address and phone are required for shipping delivery".to_string(),
                ));
            }
        }

        let line_items = self
            .inventory
            .reserve(request.lines.clone())
            .await
            .map_err(OrderError::from)?;
        info!("Stock reserved successfully");

        let params = OrderCreate {
            user_id: request.user_id,
            line_items,
            payment_method: request.payment_method,
            payment_status: request.payment_status,
            delivery_method: request.delivery_method,
            address: request.address,
            phone: request.phone,
        };
        let order = match self
            .request(|respond_to| OrderStoreRequest::Insert { params, respond_to })
            .await
        {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Order insert failed after reservation, compensating");
                if let Err(restore_err) = self.inventory.restore(request.lines).await {
                    error!(error = %restore_err, "Compensating restore failed");
                }
                return Err(e);
            }
        };

        // Fire-and-forget: a failed notification never affects the order.
        if let Err(e) = self.notifier.order_placed(&order).await {
            warn!(error = %e, "Order notification failed");
        }

        info!(order_id = %order.id, "Order created successfully");
        Ok(order)
    }

    /// Cancels an order owned by `requesting_user_id` and restores its stock.
    ///
    /// The ownership and cancellability checks and the status flip happen in
    /// one order-actor message, so a concurrent second cancel fails the
    /// precondition and stock is restored exactly once. If the restore
    /// cannot reach the ledger, the flip is compensated by reinstating the
    /// order to its prior status, so a failed cancel never strands stock.
    #[instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        order_id: String,
        requesting_user_id: String,
    ) -> Result<Order, OrderError> {
        info!("Processing cancel_order request");
        let (order, previous_status) = self
            .request(|respond_to| OrderStoreRequest::Cancel {
                id: order_id,
                requesting_user_id,
                respond_to,
            })
            .await?;

        let lines: Vec<OrderLineRequest> = order
            .line_items
            .iter()
            .map(|l| OrderLineRequest {
                product_id: l.product_id.clone(),
                quantity: l.quantity,
            })
            .collect();
        if let Err(restore_err) = self.inventory.restore(lines).await {
            error!(error = %restore_err, "Restore failed after cancel, reinstating order");
            let id = order.id.clone();
            if let Err(e) = self
                .request(|respond_to| OrderStoreRequest::Reinstate {
                    id,
                    status: previous_status,
                    respond_to,
                })
                .await
            {
                error!(error = %e, "Reinstate failed, order remains cancelled without restock");
            }
            return Err(OrderError::from(restore_err));
        }
        info!(order_id = %order.id, "Order cancelled and stock restored");
        Ok(order)
    }

    /// Admin-side status/field update.
    ///
    /// When the requested status is SHIPPING, the verified-shipper set is
    /// snapshotted here and the order actor evaluates the assignment policy
    /// against fresh active counts inside the same write.
    #[instrument(skip(self, update))]
    pub async fn transition_status(
        &self,
        order_id: String,
        update: OrderUpdate,
    ) -> Result<Order, OrderError> {
        let candidates = if update.status == Some(OrderStatus::Shipping) {
            let verified = self
                .shippers
                .list_verified()
                .await
                .map_err(|e| OrderError::ActorCommunication(e.to_string()))?;
            Some(verified.into_iter().map(|s| s.id).collect())
        } else {
            None
        };
        self.request(|respond_to| OrderStoreRequest::ApplyUpdate {
            id: order_id,
            update,
            candidates,
            respond_to,
        })
        .await
    }

    /// Shipper-side completion of their own assigned order.
    #[instrument(skip(self))]
    pub async fn mark_delivered(
        &self,
        order_id: String,
        shipper_id: String,
    ) -> Result<Order, OrderError> {
        self.request(|respond_to| OrderStoreRequest::MarkDelivered {
            id: order_id,
            shipper_id,
            respond_to,
        })
        .await
    }
}

client_method!(OrderClient => fn get_order(id: String) -> Option<Order> as OrderStoreRequest::Get, Error = OrderError);
client_method!(OrderClient => fn list_orders(filter: OrderFilter) -> Vec<Order> as OrderStoreRequest::List, Error = OrderError);
