use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World geometry classification used by probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Interactive UX elements (buttons, panels).
    Ux,
    /// Valid ground for standing and movement.
    Walkable,
    /// Impassable geometry.
    Blocked,
    /// Anything else; never matched by the locomotion masks.
    Other,
}

impl Layer {
    fn bit(self) -> u32 {
        match self {
            Self::Ux => 1 << 0,
            Self::Walkable => 1 << 1,
            Self::Blocked => 1 << 2,
            Self::Other => 1 << 3,
        }
    }
}

/// Set of layers a raycast may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: Self = Self(0);

    pub fn only(layer: Layer) -> Self {
        Self(layer.bit())
    }

    pub fn with(self, layer: Layer) -> Self {
        Self(self.0 | layer.bit())
    }

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        Self::only(layer)
    }
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Result of a successful raycast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub layer: Layer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_membership() {
        let mask = LayerMask::only(Layer::Walkable).with(Layer::Blocked);
        assert!(mask.contains(Layer::Walkable));
        assert!(mask.contains(Layer::Blocked));
        assert!(!mask.contains(Layer::Ux));
        assert!(!mask.contains(Layer::Other));
    }

    #[test]
    fn empty_mask_matches_nothing() {
        assert!(LayerMask::NONE.is_empty());
        assert!(!LayerMask::NONE.contains(Layer::Walkable));
        assert!(!LayerMask::default().contains(Layer::Ux));
    }
}
