use rust_decimal::Decimal;
use serde::Serialize;

/// A catalog product together with its available stock.
///
/// Orders never mutate a product structurally; they only move
/// `available_quantity` through the inventory ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub available_quantity: u32,
    pub published: bool,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub available_quantity: u32,
    pub published: bool,
}

/// Partial update of catalog fields.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub available_quantity: Option<u32>,
    pub published: Option<bool>,
}
