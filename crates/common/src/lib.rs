//! Shared spatial types for the XR UX crates.
//!
//! # Invariants
//! - Forward is +Z, up is +Y (left-handed, matching the host scene convention).
//! - Layer masks are plain bitsets; an empty mask matches nothing.

mod layer;
mod types;

pub use layer::{Layer, LayerMask, Ray, RayHit};
pub use types::{Hand, Transform};
