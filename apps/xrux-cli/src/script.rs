use serde::Deserialize;
use std::path::Path;
use xrux_common::Hand;
use xrux_events::{DeviceEvent, TypedValue};
use xrux_locomotion::{LocomotionController, PointerState};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("step {index}: frame {frame} comes before frame {previous}")]
    OutOfOrder { index: usize, frame: u32, previous: u32 },
    #[error("step {index} at frame {frame} does nothing")]
    EmptyStep { index: usize, frame: u32 },
}

/// Host-side update of one hand pointer. `state: null` drops the pointer.
#[derive(Debug, Clone, Deserialize)]
pub struct PointerUpdate {
    pub hand: Hand,
    #[serde(default)]
    pub state: Option<PointerState>,
}

/// Calls a UX element would make on the controller.
#[derive(Debug, Clone, Deserialize)]
pub enum ControllerCommand {
    PutOnBrakes,
    StandOnGround,
    SetMovementStyle(TypedValue),
    SetRotationStyle(TypedValue),
    SetRotationAngle(TypedValue),
}

impl ControllerCommand {
    pub fn apply(&self, controller: &mut LocomotionController) {
        match self {
            Self::PutOnBrakes => controller.put_on_brakes(),
            Self::StandOnGround => controller.stand_on_ground(),
            Self::SetMovementStyle(v) => controller.set_movement_style(v),
            Self::SetRotationStyle(v) => controller.set_rotation_style(v),
            Self::SetRotationAngle(v) => controller.set_rotation_angle(v),
        }
    }
}

/// One scripted action, applied before the given frame is stepped.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    pub frame: u32,
    #[serde(default)]
    pub pointer: Option<PointerUpdate>,
    #[serde(default)]
    pub command: Option<ControllerCommand>,
    #[serde(default)]
    pub event: Option<DeviceEvent>,
}

/// Timed input for a simulation run, ordered by frame.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScriptError> {
        let steps: Vec<ScriptStep> = serde_yaml::from_str(yaml)?;
        let mut previous = 0;
        for (index, step) in steps.iter().enumerate() {
            if step.frame < previous {
                return Err(ScriptError::OutOfOrder {
                    index,
                    frame: step.frame,
                    previous,
                });
            }
            if step.pointer.is_none() && step.command.is_none() && step.event.is_none() {
                return Err(ScriptError::EmptyStep {
                    index,
                    frame: step.frame,
                });
            }
            previous = step.frame;
        }
        Ok(Self { steps })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn last_frame(&self) -> Option<u32> {
        self.steps.last().map(|step| step.frame)
    }

    pub fn steps_at(&self, frame: u32) -> impl Iterator<Item = &ScriptStep> {
        self.steps.iter().filter(move |step| step.frame == frame)
    }
}

/// Walk forward, brake, turn, then teleport onto the platform.
pub const DEMO_SCRIPT: &str = "\
- frame: 0
  pointer:
    hand: Right
    state: { forward: [0.0, 0.0, 1.0], marker: [0.0, 0.0, 0.0], is_moving_to: false }
- frame: 0
  event: { event_type: RightThumbstick, action: Move, data: { value: !Vector3 [0.0, 0.9, 0.0] } }
- frame: 90
  event: { event_type: RightThumbstick, action: Move, data: { value: !Vector3 [0.0, 0.0, 0.0] } }
- frame: 90
  command: PutOnBrakes
- frame: 120
  event: { event_type: RightThumbstick, action: Move, data: { value: !Vector3 [0.9, 0.0, 0.0] } }
- frame: 125
  event: { event_type: RightThumbstick, action: Move, data: { value: !Vector3 [0.0, 0.0, 0.0] } }
- frame: 150
  pointer:
    hand: Right
    state: { forward: [1.0, 0.0, 0.0], marker: [4.0, 0.5, 3.0], is_moving_to: true }
- frame: 151
  event: { event_type: RightGrip, action: Click, data: { value: !Bool true } }
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use xrux_events::DeviceEventType;

    #[test]
    fn demo_script_parses() {
        let script = Script::from_yaml_str(DEMO_SCRIPT).unwrap();
        assert_eq!(script.step_count(), 8);
        assert_eq!(script.last_frame(), Some(151));
        assert_eq!(script.steps_at(0).count(), 2);
        let grip = script.steps_at(151).next().unwrap();
        let event = grip.event.as_ref().unwrap();
        assert_eq!(event.event_type, DeviceEventType::RightGrip);
        assert!(event.event_bool());
    }

    #[test]
    fn out_of_order_frames_rejected() {
        let yaml = "\
- frame: 5
  command: PutOnBrakes
- frame: 2
  command: StandOnGround
";
        let err = Script::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            ScriptError::OutOfOrder {
                index: 1,
                frame: 2,
                previous: 5
            }
        ));
    }

    #[test]
    fn empty_step_rejected() {
        let err = Script::from_yaml_str("- frame: 1\n").unwrap_err();
        assert!(matches!(err, ScriptError::EmptyStep { index: 0, .. }));
    }

    #[test]
    fn command_with_value() {
        let script =
            Script::from_yaml_str("- frame: 0\n  command: !SetRotationAngle { value: !Float 45.0 }\n")
                .unwrap();
        let step = script.steps_at(0).next().unwrap();
        match step.command.as_ref().unwrap() {
            ControllerCommand::SetRotationAngle(v) => assert_eq!(v.as_float(), 45.0),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEMO_SCRIPT.as_bytes()).unwrap();
        assert_eq!(Script::load(file.path()).unwrap().step_count(), 8);
    }
}
