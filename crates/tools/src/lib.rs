//! Developer tooling: read-only inspection of locomotion state.
//!
//! # Invariants
//! - Inspection never mutates the inspected controller.

mod inspector;

pub use inspector::{LocomotionInspector, LocomotionSummary, RigPose};

pub fn crate_info() -> &'static str {
    "xrux-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
