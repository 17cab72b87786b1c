//! `medstock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the item model,
//! the stock monitor and the device state machine (no IO).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DeviceId, ItemId, StockItemId};
