//! Bespoke actors for the stores whose operations span multiple rows.

pub mod inventory;
pub mod orders;

pub use inventory::InventoryActor;
pub use orders::OrderActor;
