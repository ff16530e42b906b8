//! Typed clients wrapping the actor mailboxes.

pub mod macros;

mod inventory_client;
mod order_client;
mod shipper_client;

pub use inventory_client::InventoryClient;
pub use order_client::OrderClient;
pub use shipper_client::ShipperClient;
