//! Core domain types shared by the actors and clients.

pub mod order;
pub mod product;
pub mod shipper;

pub use order::*;
pub use product::*;
pub use shipper::*;
