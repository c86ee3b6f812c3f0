use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use xrux_common::{Layer, LayerMask, Ray};

use crate::probe::WorldProbe;

/// Reach of the desktop mouse ray.
const DESKTOP_RAY_DISTANCE: f32 = 100.0;
/// Desktop head pitch at the top or bottom screen edge, in degrees.
const DESKTOP_MAX_PITCH: f32 = 30.0;
/// Desktop head yaw at the left or right screen edge, in degrees.
const DESKTOP_MAX_YAW: f32 = 45.0;
/// Marker enlargement over walkable ground.
const WALKABLE_MARKER_SCALE: f32 = 30.0;

/// Whether an immersive headset is driving the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum XrMode {
    #[default]
    Immersive,
    /// No headset: the mouse steers the head and picks the marker.
    Desktop,
}

/// Per-frame state of one hand pointer, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// World-space forward direction of the controller.
    pub forward: Vec3,
    /// World position of the pointer's marker.
    pub marker: Vec3,
    /// The pointer is over walkable ground and a grip would move there.
    pub is_moving_to: bool,
}

/// Mouse state for desktop mode, supplied by the host each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesktopInput {
    /// Mouse position in pixels, origin at the bottom left.
    pub mouse: Vec2,
    pub screen_size: Vec2,
    /// Camera ray through the mouse position.
    pub pointer_ray: Ray,
}

impl DesktopInput {
    /// Mouse position mapped to `[-1, 1]` on both axes, centre at zero.
    pub fn normalized_mouse(&self) -> Vec2 {
        let half = self.screen_size * 0.5;
        if half.x <= 0.0 || half.y <= 0.0 {
            return Vec2::ZERO;
        }
        ((self.mouse - half) / half).clamp(Vec2::NEG_ONE, Vec2::ONE)
    }

    /// Local head rotation for the current mouse position.
    pub fn head_look(&self) -> Quat {
        let p = self.normalized_mouse();
        Quat::from_euler(
            EulerRot::YXZ,
            (p.x * DESKTOP_MAX_YAW).to_radians(),
            (-p.y * DESKTOP_MAX_PITCH).to_radians(),
            0.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerState {
    pub position: Vec3,
    pub visible: bool,
    /// Multiple of the marker's original size.
    pub scale: f32,
}

impl Default for MarkerState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            visible: false,
            scale: 1.0,
        }
    }
}

impl MarkerState {
    fn hide(&mut self, rest: Vec3) {
        self.position = rest;
        self.visible = false;
        self.scale = 1.0;
    }
}

/// Head and marker state maintained in desktop mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesktopState {
    pub head_look: Quat,
    pub marker: MarkerState,
    /// The marker is on walkable ground and a grip would move there.
    pub is_moving_to: bool,
}

impl DesktopState {
    /// Aim the head and marker from the mouse. `rest` is where a hidden marker parks.
    pub fn update(&mut self, input: &DesktopInput, world: &dyn WorldProbe, rest: Vec3) {
        self.head_look = input.head_look();

        let mask = LayerMask::only(Layer::Ux)
            .with(Layer::Walkable)
            .with(Layer::Blocked);
        let hit = world.raycast(
            input.pointer_ray.origin,
            input.pointer_ray.direction,
            DESKTOP_RAY_DISTANCE,
            mask,
        );
        match hit {
            Some(hit) if hit.layer == Layer::Ux => {
                self.marker = MarkerState {
                    position: hit.point,
                    visible: true,
                    scale: 1.0,
                };
                self.is_moving_to = false;
            }
            Some(hit) if hit.layer == Layer::Walkable => {
                self.marker = MarkerState {
                    position: hit.point,
                    visible: true,
                    scale: WALKABLE_MARKER_SCALE,
                };
                self.is_moving_to = true;
            }
            _ => {
                self.marker.hide(rest);
                self.is_moving_to = false;
            }
        }
    }

    pub fn hide_marker(&mut self, rest: Vec3) {
        self.marker.hide(rest);
    }
}

/// Something the host can show or hide, such as the instructions panel.
pub trait Visibility {
    fn set_visible(&mut self, visible: bool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticWorld;

    fn input_at(mouse: Vec2, ray: Ray) -> DesktopInput {
        DesktopInput {
            mouse,
            screen_size: Vec2::new(800.0, 600.0),
            pointer_ray: ray,
        }
    }

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 5.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn mouse_normalization_clamps() {
        let input = input_at(Vec2::new(1200.0, 0.0), down_at(0.0, 0.0));
        assert_eq!(input.normalized_mouse(), Vec2::new(1.0, -1.0));
        let centre = input_at(Vec2::new(400.0, 300.0), down_at(0.0, 0.0));
        assert_eq!(centre.normalized_mouse(), Vec2::ZERO);
        assert_eq!(centre.head_look(), Quat::IDENTITY);
    }

    #[test]
    fn right_edge_turns_head_45_degrees() {
        let input = input_at(Vec2::new(800.0, 300.0), down_at(0.0, 0.0));
        let forward = input.head_look() * Vec3::Z;
        let yaw = forward.x.atan2(forward.z).to_degrees();
        assert!((yaw - 45.0).abs() < 1e-3);
    }

    #[test]
    fn walkable_hit_enlarges_marker_and_targets() {
        let world = StaticWorld::with_floor(10.0, 0.0);
        let mut desktop = DesktopState::default();
        desktop.update(
            &input_at(Vec2::new(400.0, 300.0), down_at(2.0, 3.0)),
            &world,
            Vec3::ZERO,
        );
        assert!(desktop.is_moving_to);
        assert!(desktop.marker.visible);
        assert_eq!(desktop.marker.scale, WALKABLE_MARKER_SCALE);
        assert!((desktop.marker.position - Vec3::new(2.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn ux_hit_shows_marker_without_target() {
        let mut world = StaticWorld::with_floor(10.0, 0.0);
        world.add_box(Vec3::new(-1.0, 1.0, -1.0), Vec3::new(1.0, 1.2, 1.0), Layer::Ux);
        let mut desktop = DesktopState::default();
        desktop.update(
            &input_at(Vec2::new(400.0, 300.0), down_at(0.0, 0.0)),
            &world,
            Vec3::ZERO,
        );
        assert!(!desktop.is_moving_to);
        assert!(desktop.marker.visible);
        assert_eq!(desktop.marker.scale, 1.0);
    }

    #[test]
    fn blocked_hit_or_miss_hides_marker() {
        let mut world = StaticWorld::with_floor(10.0, 0.0);
        world.add_box(Vec3::new(3.0, 0.0, -1.0), Vec3::new(4.0, 2.0, 1.0), Layer::Blocked);
        let mut desktop = DesktopState::default();
        let rest = Vec3::new(0.0, 0.0, 1.0);

        desktop.update(&input_at(Vec2::ZERO, down_at(1.0, 0.0)), &world, rest);
        assert!(desktop.is_moving_to);

        desktop.update(&input_at(Vec2::ZERO, down_at(3.5, 0.0)), &world, rest);
        assert!(!desktop.is_moving_to);
        assert!(!desktop.marker.visible);
        assert_eq!(desktop.marker.position, rest);

        desktop.update(&input_at(Vec2::ZERO, down_at(1.0, 0.0)), &world, rest);
        desktop.update(&input_at(Vec2::ZERO, down_at(50.0, 0.0)), &world, rest);
        assert!(!desktop.is_moving_to);
        assert!(!desktop.marker.visible);
    }
}
