//! Reusable medical devices and their maintenance lifecycle.
//!
//! A [`Device`] delegates every operator command to its current
//! [`DeviceState`], which decides the response and the transition. Devices
//! never fail: rejected commands are reported to the alert sink.

pub mod device;
pub mod state;

pub use device::Device;
pub use state::{DeviceCommand, DeviceEvent, DeviceRejection, DeviceState, MAINTENANCE_THRESHOLD};
