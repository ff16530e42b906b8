//! The inventory ledger.
//!
//! Owns every product row and serializes all stock movement through its
//! mailbox. `Reserve` validates the whole batch before touching any row, so
//! a failed line can never leave a partial decrement behind, and concurrent
//! checkouts of the same product cannot interleave between check and write.

use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::clients::InventoryClient;
use crate::domain::{OrderLineItem, OrderLineRequest, Product, ProductCreate, ProductPatch};
use crate::error::InventoryError;
use crate::messages::{InventoryRequest, ServiceResponse};

pub struct InventoryActor {
    receiver: mpsc::Receiver<InventoryRequest>,
    products: HashMap<String, Product>,
    next_id: u64,
}

impl InventoryActor {
    pub fn new(buffer_size: usize) -> (Self, InventoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            products: HashMap::new(),
            next_id: 1,
        };
        (actor, InventoryClient::new(sender))
    }

    #[instrument(name = "inventory_actor", skip(self))]
    pub async fn run(mut self) {
        info!("InventoryActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                InventoryRequest::AddProduct { params, respond_to } => {
                    let _ = respond_to.send(self.handle_add_product(params));
                }
                InventoryRequest::GetProduct { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.products.get(&id).cloned()));
                }
                InventoryRequest::ListProducts { respond_to } => {
                    let mut items: Vec<Product> = self.products.values().cloned().collect();
                    items.sort_by(|a, b| a.id.cmp(&b.id));
                    let _ = respond_to.send(Ok(items));
                }
                InventoryRequest::UpdateProduct {
                    id,
                    patch,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_update_product(id, patch));
                }
                InventoryRequest::CheckAvailability {
                    product_id,
                    quantity,
                    respond_to,
                } => {
                    let available = self
                        .products
                        .get(&product_id)
                        .map(|p| p.available_quantity >= quantity)
                        .unwrap_or(false);
                    let _ = respond_to.send(Ok(available));
                }
                InventoryRequest::Reserve { lines, respond_to } => {
                    self.handle_reserve(lines, respond_to);
                }
                InventoryRequest::Restore { lines, respond_to } => {
                    self.handle_restore(lines, respond_to);
                }
            }
        }
        info!("InventoryActor stopped");
    }

    fn handle_add_product(&mut self, params: ProductCreate) -> Result<String, InventoryError> {
        if params.price.is_sign_negative() {
            return Err(InventoryError::InvalidPrice(params.price));
        }
        let id = format!("product_{}", self.next_id);
        self.next_id += 1;
        let product = Product {
            id: id.clone(),
            name: params.name,
            price: params.price,
            available_quantity: params.available_quantity,
            published: params.published,
        };
        info!(product_id = %id, name = %product.name, "Product added");
        self.products.insert(id.clone(), product);
        Ok(id)
    }

    fn handle_update_product(
        &mut self,
        id: String,
        patch: ProductPatch,
    ) -> Result<Product, InventoryError> {
        if let Some(price) = patch.price {
            if price.is_sign_negative() {
                return Err(InventoryError::InvalidPrice(price));
            }
        }
        let product = self
            .products
            .get_mut(&id)
            .ok_or_else(|| InventoryError::NotFound(id.clone()))?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(quantity) = patch.available_quantity {
            product.available_quantity = quantity;
        }
        if let Some(published) = patch.published {
            product.published = published;
        }
        Ok(product.clone())
    }

    #[instrument(skip(self, respond_to), fields(line_count = lines.len()))]
    fn handle_reserve(
        &mut self,
        lines: Vec<OrderLineRequest>,
        respond_to: ServiceResponse<Vec<OrderLineItem>, InventoryError>,
    ) {
        let _ = respond_to.send(self.reserve(lines));
    }

    fn reserve(&mut self, lines: Vec<OrderLineRequest>) -> Result<Vec<OrderLineItem>, InventoryError> {
        // Existence pass: every product is looked up before any stock math,
        // so a missing product is reported ahead of an insufficient one.
        for line in &lines {
            if line.quantity == 0 {
                return Err(InventoryError::InvalidQuantity(0));
            }
            if !self.products.contains_key(&line.product_id) {
                return Err(InventoryError::NotFound(line.product_id.clone()));
            }
        }

        // Sufficiency pass: nothing is mutated until every line has passed.
        // Quantities are accumulated per product so a cart holding the same
        // product twice is checked against the combined demand.
        let mut needed: HashMap<&str, u32> = HashMap::new();
        for line in &lines {
            let product = self
                .products
                .get(&line.product_id)
                .ok_or_else(|| InventoryError::NotFound(line.product_id.clone()))?;
            let total = needed.entry(line.product_id.as_str()).or_insert(0);
            *total = total
                .checked_add(line.quantity)
                .ok_or(InventoryError::InvalidQuantity(line.quantity))?;
            if product.available_quantity < *total {
                debug!(
                    product_id = %line.product_id,
                    requested = *total,
                    available = product.available_quantity,
                    "Reservation rejected"
                );
                return Err(InventoryError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: *total,
                    available: product.available_quantity,
                });
            }
        }

        // Decrement pass. Prices and names are captured here, at the same
        // instant as the decrement, and become immutable on the order.
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = self
                .products
                .get_mut(&line.product_id)
                .ok_or_else(|| InventoryError::NotFound(line.product_id.clone()))?;
            product.available_quantity -= line.quantity;
            items.push(OrderLineItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: line.quantity,
                unit_price_at_purchase: product.price,
            });
        }
        info!(line_count = items.len(), "Stock reserved");
        Ok(items)
    }

    #[instrument(skip(self, respond_to), fields(line_count = lines.len()))]
    fn handle_restore(
        &mut self,
        lines: Vec<OrderLineRequest>,
        respond_to: ServiceResponse<(), InventoryError>,
    ) {
        for line in &lines {
            match self.products.get_mut(&line.product_id) {
                Some(product) => {
                    // Restoration trusts the order-status guard upstream to
                    // run at most once per order; the clamp only guards the
                    // arithmetic itself.
                    product.available_quantity =
                        match product.available_quantity.checked_add(line.quantity) {
                            Some(total) => total,
                            None => {
                                warn!(product_id = %line.product_id, "Restore clamped at maximum quantity");
                                u32::MAX
                            }
                        };
                }
                None => {
                    warn!(product_id = %line.product_id, "Restore skipped, product no longer exists");
                }
            }
        }
        info!(line_count = lines.len(), "Stock restored");
        let _ = respond_to.send(Ok(()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn actor_with_products(products: Vec<(&str, u32)>) -> InventoryActor {
        let (mut actor, _client) = InventoryActor::new(8);
        for (name, quantity) in products {
            actor
                .handle_add_product(ProductCreate {
                    name: name.to_string(),
                    price: Decimal::new(1000, 2),
                    available_quantity: quantity,
                    published: true,
                })
                .unwrap();
        }
        actor
    }

    fn line(product_id: &str, quantity: u32) -> OrderLineRequest {
        OrderLineRequest {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn reserve_decrements_and_captures_price() {
        let mut actor = actor_with_products(vec![("Tulips", 10)]);
        let items = actor.reserve(vec![line("product_1", 4)]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "Tulips");
        assert_eq!(items[0].unit_price_at_purchase, Decimal::new(1000, 2));
        assert_eq!(actor.products["product_1"].available_quantity, 6);
    }

    #[test]
    fn failed_line_leaves_earlier_lines_untouched() {
        let mut actor = actor_with_products(vec![("Tulips", 10), ("Lilies", 1)]);
        let err = actor
            .reserve(vec![line("product_1", 4), line("product_2", 3)])
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                product_id: "product_2".to_string(),
                requested: 3,
                available: 1,
            }
        );
        // The first line passed validation but must not have been decremented.
        assert_eq!(actor.products["product_1"].available_quantity, 10);
        assert_eq!(actor.products["product_2"].available_quantity, 1);
    }

    #[test]
    fn duplicate_product_lines_are_checked_against_combined_demand() {
        let mut actor = actor_with_products(vec![("Tulips", 5)]);
        let err = actor
            .reserve(vec![line("product_1", 3), line("product_1", 3)])
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                product_id: "product_1".to_string(),
                requested: 6,
                available: 5,
            }
        );
        assert_eq!(actor.products["product_1"].available_quantity, 5);
    }

    #[test]
    fn unknown_product_aborts_reservation() {
        let mut actor = actor_with_products(vec![("Tulips", 5)]);
        let err = actor
            .reserve(vec![line("product_1", 1), line("product_9", 1)])
            .unwrap_err();
        assert_eq!(err, InventoryError::NotFound("product_9".to_string()));
        assert_eq!(actor.products["product_1"].available_quantity, 5);
    }

    #[test]
    fn missing_product_outranks_insufficient_stock() {
        let mut actor = actor_with_products(vec![("Tulips", 1)]);
        let err = actor
            .reserve(vec![line("product_1", 5), line("product_9", 1)])
            .unwrap_err();
        assert_eq!(err, InventoryError::NotFound("product_9".to_string()));
        assert_eq!(actor.products["product_1"].available_quantity, 1);
    }

    #[test]
    fn combined_demand_overflow_is_rejected() {
        let mut actor = actor_with_products(vec![("Tulips", u32::MAX)]);
        let err = actor
            .reserve(vec![line("product_1", u32::MAX), line("product_1", 1)])
            .unwrap_err();
        assert_eq!(err, InventoryError::InvalidQuantity(1));
        assert_eq!(actor.products["product_1"].available_quantity, u32::MAX);
    }

    #[test]
    fn restore_clamps_instead_of_wrapping() {
        let mut actor = actor_with_products(vec![("Tulips", u32::MAX - 1)]);
        let (respond_to, mut response) = tokio::sync::oneshot::channel();
        actor.handle_restore(vec![line("product_1", 5)], respond_to);
        assert_eq!(actor.products["product_1"].available_quantity, u32::MAX);
        response.try_recv().unwrap().unwrap();
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let mut actor = actor_with_products(vec![("Tulips", 5)]);
        let err = actor.reserve(vec![line("product_1", 0)]).unwrap_err();
        assert_eq!(err, InventoryError::InvalidQuantity(0));
    }

    #[test]
    fn negative_price_is_rejected() {
        let (mut actor, _client) = InventoryActor::new(8);
        let err = actor
            .handle_add_product(ProductCreate {
                name: "Broken".to_string(),
                price: Decimal::new(-100, 2),
                available_quantity: 1,
                published: true,
            })
            .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidPrice(_)));
    }
}
