//! UX widgets that consume and produce [`TypedValue`](xrux_events::TypedValue)s.
//!
//! # Invariants
//! - Every widget has a single `input` entry point taking a typed value.
//! - Widgets without a display sink accept input and do nothing visible.
//! - Bus-facing widgets publish synchronously through the bus they were built with.

mod connectors;
mod console;
mod display;
mod proximity;
mod textfield;
mod to_console;

pub use connectors::{IntegerSource, ToData};
pub use console::{Console, DEFAULT_CONSOLE_LINES};
pub use display::{SharedText, TextSink};
pub use proximity::{DEFAULT_PROXIMITY_DISTANCE, ProximityTrigger};
pub use textfield::TextField;
pub use to_console::ToConsole;

pub fn crate_info() -> &'static str {
    "xrux-widgets v0.1.0"
}
