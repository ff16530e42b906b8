use tokio::sync::mpsc;

use crate::client_method;
use crate::domain::{OrderLineItem, OrderLineRequest, Product, ProductCreate, ProductPatch};
use crate::error::InventoryError;
use crate::messages::InventoryRequest;

/// Client for the inventory ledger.
#[derive(Clone)]
pub struct InventoryClient {
    sender: mpsc::Sender<InventoryRequest>,
}

impl InventoryClient {
    pub fn new(sender: mpsc::Sender<InventoryRequest>) -> Self {
        Self { sender }
    }
}

client_method!(InventoryClient => fn add_product(params: ProductCreate) -> String as InventoryRequest::AddProduct, Error = InventoryError);
client_method!(InventoryClient => fn get_product(id: String) -> Option<Product> as InventoryRequest::GetProduct, Error = InventoryError);
client_method!(InventoryClient => fn list_products() -> Vec<Product> as InventoryRequest::ListProducts, Error = InventoryError);
client_method!(InventoryClient => fn update_product(id: String, patch: ProductPatch) -> Product as InventoryRequest::UpdateProduct, Error = InventoryError);
client_method!(InventoryClient => fn check_availability(product_id: String, quantity: u32) -> bool as InventoryRequest::CheckAvailability, Error = InventoryError);
client_method!(InventoryClient => fn reserve(lines: Vec<OrderLineRequest>) -> Vec<OrderLineItem> as InventoryRequest::Reserve, Error = InventoryError);
client_method!(InventoryClient => fn restore(lines: Vec<OrderLineRequest>) -> () as InventoryRequest::Restore, Error = InventoryError);
