//! Device events: typed payload values, the device event bus, data signals.
//!
//! # Invariants
//! - Dispatch order equals subscription order.
//! - Dispatch is synchronous on the calling thread; nothing is queued.
//! - Typed value coercions are total and never panic.

mod bus;
mod event;
mod signal;
mod value;

pub use bus::{DeviceEventListener, EventBus, SubscriptionId};
pub use event::{DeviceAction, DeviceEvent, DeviceEventType};
pub use signal::DataSignal;
pub use value::{Mode, TypedValue, Value};
