//! Stock monitoring and the inventory facade.
//!
//! A [`StockItem`] binds one consumable to a quantity and an optional
//! expiration date and notifies its observers after every successful change.
//! [`CriticalStockObserver`] and [`ExpirationAlarmObserver`] turn those
//! notifications into alert lines. [`Inventory`] aggregates stock records,
//! devices and the category tree.

pub mod alerts;
pub mod clock;
pub mod config;
pub mod inventory;
pub mod stock;

pub use alerts::{CriticalStockObserver, ExpirationAlarmObserver};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AlertConfig;
pub use inventory::Inventory;
pub use stock::{StockCommand, StockEvent, StockItem, StockObserver};
