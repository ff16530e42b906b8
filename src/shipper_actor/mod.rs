//! Shipper registry behavior for the generic resource actor.

mod actions;
pub mod entity;

pub use actions::*;
