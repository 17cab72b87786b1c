//! Change notification mechanics: subject/observer registry, the alert sink,
//! and the decide-then-apply execution helper.
//!
//! Everything here is synchronous and runs on the caller's thread. An
//! observer's `update` completes before the next observer is invoked.

pub mod handler;
pub mod observer;
pub mod sink;

pub use handler::execute;
pub use observer::{Observer, ObserverSet};
pub use sink::{AlertSink, MemorySink, StdoutSink, stdout};
