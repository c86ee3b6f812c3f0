use glam::Vec3;
use serde::Serialize;
use std::fmt;
use xrux_locomotion::{
    FadeState, LocomotionController, MovementStyle, QualityMode, RotationStyle, SettingsSource,
    XrMode,
};

/// Locomotion inspector for developer tooling.
///
/// Read-only views of a controller for logs, the command line and debug UI.
pub struct LocomotionInspector;

impl LocomotionInspector {
    pub fn summary(controller: &LocomotionController) -> LocomotionSummary {
        let state = controller.state();
        LocomotionSummary {
            clock: state.clock,
            xr_mode: controller.xr_mode(),
            position: to_array(state.position),
            yaw: state.yaw,
            speed: state.velocity.length(),
            flying: state.flying,
            moving_to_target: state.moving_to_target,
            fade: state.fade.state(),
            movement_style: state.movement_style,
            rotation_style: state.rotation_style,
            quality_mode: controller.quality_mode(),
            settings_source: controller.settings_source(),
            instructions_dismissed: controller.instructions_dismissed(),
        }
    }

    pub fn pose(controller: &LocomotionController) -> RigPose {
        let transform = controller.transform();
        let r = transform.rotation;
        RigPose {
            position: to_array(transform.position),
            rotation: [r.x, r.y, r.z, r.w],
            yaw: controller.state().yaw,
            head_height: controller.head_height(),
        }
    }
}

fn to_array(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Snapshot of controller state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocomotionSummary {
    pub clock: f32,
    pub xr_mode: XrMode,
    pub position: [f32; 3],
    pub yaw: f32,
    pub speed: f32,
    pub flying: bool,
    pub moving_to_target: bool,
    pub fade: FadeState,
    pub movement_style: MovementStyle,
    pub rotation_style: RotationStyle,
    pub quality_mode: QualityMode,
    pub settings_source: SettingsSource,
    pub instructions_dismissed: bool,
}

impl fmt::Display for LocomotionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Locomotion: t={:.2} pos=({:.2}, {:.2}, {:.2}) yaw={:.1} speed={:.4} flying={} fade={:?} quality={:?}",
            self.clock,
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw,
            self.speed,
            self.flying,
            self.fade,
            self.quality_mode,
        )
    }
}

/// World pose of the rig.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigPose {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub yaw: f32,
    pub head_height: f32,
}

impl fmt::Display for RigPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rig pos=({:.2}, {:.2}, {:.2}) yaw={:.1} head={:.2}",
            self.position[0], self.position[1], self.position[2], self.yaw, self.head_height,
        )
    }
}
