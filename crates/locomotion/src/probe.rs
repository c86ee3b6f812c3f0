use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use xrux_common::{Layer, LayerMask, RayHit};

/// Raycasts against the world. Implemented by the host physics scene.
pub trait WorldProbe {
    /// Nearest hit along `direction` within `max_distance` on a layer in `mask`.
    /// `direction` need not be normalized; a zero direction never hits.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

impl<T: WorldProbe + ?Sized> WorldProbe for Rc<T> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance, mask)
    }
}

impl<T: WorldProbe + ?Sized> WorldProbe for Box<T> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance, mask)
    }
}

/// Extra reach of the downward obstacle probe below the feet.
const OBSTACLE_PROBE_MARGIN: f32 = 0.1;
/// Extra reach of the ground-height probe below the feet.
const GROUND_PROBE_MARGIN: f32 = 0.5;
/// Forward probe length as a multiple of the per-frame step.
const FORWARD_PROBE_SCALE: f32 = 10.0;

/// The locomotion probes, cast from head height above a foot position.
///
/// A miss is never an error: no ground means no snap, no obstacle means no block.
pub struct GroundProbe<'a> {
    world: &'a dyn WorldProbe,
    head_height: f32,
}

impl<'a> GroundProbe<'a> {
    pub fn new(world: &'a dyn WorldProbe, head_height: f32) -> Self {
        Self { world, head_height }
    }

    fn head_origin(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::Y * self.head_height
    }

    /// Whether the column under `position + step` is blocked.
    ///
    /// Blocked when a blocked-layer surface is found and either no walkable
    /// surface is found or the blocked one lies strictly above it.
    pub fn blocked_below(&self, position: Vec3, step: Vec3) -> bool {
        let origin = self.head_origin(position + step);
        let reach = self.head_height + OBSTACLE_PROBE_MARGIN;
        let blocked = self
            .world
            .raycast(origin, Vec3::NEG_Y, reach, LayerMask::only(Layer::Blocked));
        let walkable = self
            .world
            .raycast(origin, Vec3::NEG_Y, reach, LayerMask::only(Layer::Walkable));
        match (blocked, walkable) {
            (Some(b), Some(w)) => b.point.y > w.point.y,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Whether blocked geometry lies ahead along the horizontal part of `step`.
    pub fn blocked_ahead(&self, position: Vec3, step: Vec3) -> bool {
        let direction = Vec3::new(step.x, 0.0, step.z);
        self.world
            .raycast(
                self.head_origin(position),
                direction,
                step.length() * FORWARD_PROBE_SCALE,
                LayerMask::only(Layer::Blocked),
            )
            .is_some()
    }

    /// Vertical offset from `position` to the walkable surface below the head, if any.
    pub fn ground_offset(&self, position: Vec3) -> Option<f32> {
        self.world
            .raycast(
                self.head_origin(position),
                Vec3::NEG_Y,
                self.head_height + GROUND_PROBE_MARGIN,
                LayerMask::only(Layer::Walkable),
            )
            .map(|hit| hit.point.y - position.y)
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Entry distance of a ray with unit `dir`, slab method.
    ///
    /// Rays starting inside the box do not hit it.
    fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let (o, d) = (origin[axis], dir[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() <= f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        (t_min >= 0.0).then_some(t_min)
    }
}

/// A box of world geometry on one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub bounds: Aabb,
    pub layer: Layer,
}

/// A static world made of layered boxes.
///
/// Stands in for the host physics scene in tests and the command line driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticWorld {
    pub colliders: Vec<Collider>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_box(&mut self, a: Vec3, b: Vec3, layer: Layer) -> &mut Self {
        self.colliders.push(Collider {
            bounds: Aabb::new(a, b),
            layer,
        });
        self
    }

    /// Square walkable slab whose top face is at `height`, centred on the origin.
    pub fn with_floor(half_extent: f32, height: f32) -> Self {
        let mut world = Self::new();
        world.add_box(
            Vec3::new(-half_extent, height - 1.0, -half_extent),
            Vec3::new(half_extent, height, half_extent),
            Layer::Walkable,
        );
        world
    }
}

impl WorldProbe for StaticWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        if direction.length_squared() <= 1e-12 || max_distance <= 0.0 {
            return None;
        }
        let dir = direction.normalize();
        self.colliders
            .iter()
            .filter(|c| mask.contains(c.layer))
            .filter_map(|c| {
                c.bounds
                    .ray_entry(origin, dir)
                    .filter(|t| *t <= max_distance)
                    .map(|t| RayHit {
                        point: origin + dir * t,
                        distance: t,
                        layer: c.layer,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
