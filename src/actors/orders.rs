//! The order store.
//!
//! Owns every order row. Preconditions and the write they guard always run
//! inside the same message handler: cancellation checks ownership and
//! cancellability before flipping status, and the VERIFIED -> SHIPPING
//! transition computes fresh shipper loads and attaches the selection in the
//! same write.

use std::collections::HashMap;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::assignment::{select_shipper, ShipperLoad};
use crate::domain::{Order, OrderCreate, OrderFilter, OrderStatus, OrderUpdate, PaymentStatus};
use crate::error::OrderError;
use crate::messages::OrderStoreRequest;

pub struct OrderActor {
    receiver: mpsc::Receiver<OrderStoreRequest>,
    orders: HashMap<String, Order>,
    next_id: u64,
}

impl OrderActor {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Sender<OrderStoreRequest>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            orders: HashMap::new(),
            next_id: 1,
        };
        (actor, sender)
    }

    #[instrument(name = "order_actor", skip(self))]
    pub async fn run(mut self) {
        info!("OrderActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderStoreRequest::Insert { params, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_insert(params)));
                }
                OrderStoreRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.orders.get(&id).cloned()));
                }
                OrderStoreRequest::List { filter, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_list(&filter)));
                }
                OrderStoreRequest::Cancel {
                    id,
                    requesting_user_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_cancel(id, requesting_user_id));
                }
                OrderStoreRequest::Reinstate {
                    id,
                    status,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_reinstate(id, status));
                }
                OrderStoreRequest::ApplyUpdate {
                    id,
                    update,
                    candidates,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_apply_update(id, update, candidates));
                }
                OrderStoreRequest::MarkDelivered {
                    id,
                    shipper_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_mark_delivered(id, shipper_id));
                }
            }
        }
        info!("OrderActor stopped");
    }

    fn handle_insert(&mut self, params: OrderCreate) -> Order {
        let id = format!("order_{}", self.next_id);
        self.next_id += 1;
        let now = Utc::now();
        let total_amount: Decimal = params.line_items.iter().map(|l| l.line_total()).sum();
        let order = Order {
            id: id.clone(),
            user_id: params.user_id,
            line_items: params.line_items,
            total_amount,
            status: OrderStatus::Pending,
            payment_method: params.payment_method,
            payment_status: params.payment_status.unwrap_or(PaymentStatus::Pending),
            delivery_method: params.delivery_method,
            shipper_id: None,
            address: params.address,
            phone: params.phone,
            created_at: now,
            updated_at: now,
        };
        info!(order_id = %id, total = %order.total_amount, "Order inserted");
        self.orders.insert(id, order.clone());
        order
    }

    fn handle_list(&self, filter: &OrderFilter) -> Vec<Order> {
        let mut matched: Vec<Order> = self
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        let page: Vec<Order> = matched.into_iter().skip(filter.offset).collect();
        match filter.limit {
            Some(limit) => page.into_iter().take(limit).collect(),
            None => page,
        }
    }

    #[instrument(skip(self), fields(order_id = %id))]
    fn handle_cancel(
        &mut self,
        id: String,
        requesting_user_id: String,
    ) -> Result<(Order, OrderStatus), OrderError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        if order.user_id != requesting_user_id {
            return Err(OrderError::Forbidden(format!(
                "order {id} does not belong to {requesting_user_id}"
            )));
        }
        if !order.status.is_cancellable() {
            // A second cancel lands here: the first one moved the order out
            // of PENDING/VERIFIED, so stock is restored at most once.
            return Err(OrderError::InvalidState {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }
        let previous_status = order.status;
        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        info!("Order cancelled");
        Ok((order.clone(), previous_status))
    }

    /// Rolls a CANCELLED order back to the status it held before the cancel.
    /// Only reachable as compensation when the stock restore failed.
    #[instrument(skip(self), fields(order_id = %id))]
    fn handle_reinstate(&mut self, id: String, status: OrderStatus) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        if order.status != OrderStatus::Cancelled {
            return Err(OrderError::InvalidState {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        order.updated_at = Utc::now();
        info!(status = %status, "Order reinstated after failed restore");
        Ok(order.clone())
    }

    #[instrument(skip(self, update, candidates), fields(order_id = %id))]
    fn handle_apply_update(
        &mut self,
        id: String,
        update: OrderUpdate,
        candidates: Option<Vec<String>>,
    ) -> Result<Order, OrderError> {
        let current = self
            .orders
            .get(&id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?
            .status;

        // Validate everything before mutating anything.
        let mut assignment: Option<Option<String>> = None;
        if let Some(next) = update.status {
            if next == OrderStatus::Cancelled {
                // Cancellation owns the stock restoration and must go
                // through the cancel operation, not a field update.
                return Err(OrderError::Validation(
                    "cancellation must go through cancel_order".to_string(),
                ));
            }
            if next != current && !current.can_transition_to(next) {
                return Err(OrderError::InvalidState {
                    from: current,
                    to: next,
                });
            }
            if current == OrderStatus::Verified && next == OrderStatus::Shipping {
                let loads = self.shipper_loads(candidates.unwrap_or_default());
                let selected = select_shipper(&loads);
                debug!(shipper = ?selected, "Assignment policy evaluated");
                assignment = Some(selected);
            }
        }

        let order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        if let Some(next) = update.status {
            order.status = next;
        }
        if let Some(selected) = assignment {
            order.shipper_id = selected;
            info!(shipper = ?order.shipper_id, "Order moved to SHIPPING");
        }
        Self::apply_fields(order, update);
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    fn apply_fields(order: &mut Order, update: OrderUpdate) {
        if let Some(payment_status) = update.payment_status {
            order.payment_status = payment_status;
        }
        if let Some(payment_method) = update.payment_method {
            order.payment_method = payment_method;
        }
        if let Some(delivery_method) = update.delivery_method {
            order.delivery_method = delivery_method;
        }
        if let Some(address) = update.address {
            order.address = Some(address);
        }
        if let Some(phone) = update.phone {
            order.phone = Some(phone);
        }
    }

    /// Active-shipping counts for the candidate set, computed fresh from the
    /// rows this actor owns at the moment of the transition.
    fn shipper_loads(&self, candidates: Vec<String>) -> Vec<ShipperLoad> {
        candidates
            .into_iter()
            .map(|shipper_id| {
                let active_shipping_count = self
                    .orders
                    .values()
                    .filter(|o| {
                        o.status == OrderStatus::Shipping
                            && o.shipper_id.as_deref() == Some(shipper_id.as_str())
                    })
                    .count();
                ShipperLoad {
                    shipper_id,
                    active_shipping_count,
                }
            })
            .collect()
    }

    #[instrument(skip(self), fields(order_id = %id))]
    fn handle_mark_delivered(
        &mut self,
        id: String,
        shipper_id: String,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        if order.shipper_id.as_deref() != Some(shipper_id.as_str()) {
            return Err(OrderError::Forbidden(format!(
                "order {id} is not assigned to shipper {shipper_id}"
            )));
        }
        if order.status != OrderStatus::Shipping {
            return Err(OrderError::InvalidState {
                from: order.status,
                to: OrderStatus::Delivered,
            });
        }
        order.status = OrderStatus::Delivered;
        order.updated_at = Utc::now();
        info!("Order delivered");
        Ok(order.clone())
    }
}
