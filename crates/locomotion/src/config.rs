use serde::{Deserialize, Serialize};
use std::path::Path;
use xrux_common::Hand;

use crate::quality::QualitySettings;

/// How a grip click on a walkable target moves the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementStyle {
    /// Fade out, jump to the marker at full opacity, fade back in.
    #[default]
    Teleport,
    /// Glide to the marker on a damped spring.
    Slide,
}

/// How the turn axis of the thumbstick rotates the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationStyle {
    /// Fixed-angle snaps, at most one per step interval.
    #[default]
    Stepped,
    /// Continuous angular velocity with acceleration and friction.
    Smooth,
}

/// Which transform defines "forward" for thumbstick movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementPointer {
    Head,
    #[default]
    Controller,
}

/// Errors from loading or validating configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables of the locomotion controller.
///
/// Missing YAML keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub movement_style: MovementStyle,
    pub rotation_style: RotationStyle,
    /// Hand whose thumbstick drives turning and forward movement.
    pub movement_hand: Hand,
    pub movement_pointer: MovementPointer,
    /// Use the other hand's thumbstick for vertical (flight) movement.
    pub other_thumbstick_for_height: bool,
    /// Eye height used when no head pose is tracked.
    pub height: f32,
    /// Total duration of a teleport fade, in seconds.
    pub teleport_fade_time: f32,
    pub acceleration_factor: f32,
    pub friction_factor: f32,
    /// Maximum distance moved per frame.
    pub maximum_velocity: f32,
    pub maximum_flying_height: f32,
    /// Degrees turned per stepped rotation.
    pub stepping_angle: f32,
    pub rotation_friction_factor: f32,
    pub rotation_acceleration_factor: f32,
    /// Scene object consulted for quality overrides on scene load.
    pub scene_settings_object_name: String,
    pub quality: QualitySettings,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            movement_style: MovementStyle::Teleport,
            rotation_style: RotationStyle::Stepped,
            movement_hand: Hand::Right,
            movement_pointer: MovementPointer::Controller,
            other_thumbstick_for_height: true,
            height: 2.0,
            teleport_fade_time: 2.0,
            acceleration_factor: 1.0,
            friction_factor: 1.0,
            maximum_velocity: 0.05,
            maximum_flying_height: 20.0,
            stepping_angle: 30.0,
            rotation_friction_factor: 0.5,
            rotation_acceleration_factor: 2.0,
            scene_settings_object_name: "ENTRY".to_owned(),
            quality: QualitySettings::default(),
        }
    }
}

impl LocomotionConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded locomotion config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.teleport_fade_time.is_nan() || self.teleport_fade_time <= 0.0 {
            return Err(invalid("teleport_fade_time", "must be greater than zero"));
        }
        let non_negative = [
            ("height", self.height),
            ("acceleration_factor", self.acceleration_factor),
            ("friction_factor", self.friction_factor),
            ("maximum_velocity", self.maximum_velocity),
            ("maximum_flying_height", self.maximum_flying_height),
            ("rotation_friction_factor", self.rotation_friction_factor),
            ("rotation_acceleration_factor", self.rotation_acceleration_factor),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if !self.stepping_angle.is_finite() {
            return Err(invalid("stepping_angle", "must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::AntiAliasing;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = LocomotionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.maximum_velocity, 0.05);
        assert_eq!(config.scene_settings_object_name, "ENTRY");
        assert_eq!(config.movement_hand, Hand::Right);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = LocomotionConfig::from_yaml_str(
            "movement_style: Slide\nstepping_angle: 45.0\nquality:\n  dynamic_quality: false\n",
        )
        .unwrap();
        assert_eq!(config.movement_style, MovementStyle::Slide);
        assert_eq!(config.stepping_angle, 45.0);
        assert!(!config.quality.dynamic_quality);
        assert_eq!(config.teleport_fade_time, 2.0);
        assert_eq!(
            config.quality.standing.anti_aliasing,
            AntiAliasing::EightTimes
        );
    }

    #[test]
    fn zero_fade_time_rejected() {
        let err = LocomotionConfig::from_yaml_str("teleport_fade_time: 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "teleport_fade_time",
                ..
            }
        ));
    }

    #[test]
    fn negative_velocity_rejected() {
        let config = LocomotionConfig {
            maximum_velocity: -1.0,
            ..LocomotionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_yaml_error() {
        let err = LocomotionConfig::from_yaml_str("height: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_round_trip_through_file() {
        let config = LocomotionConfig {
            movement_pointer: MovementPointer::Head,
            ..LocomotionConfig::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = LocomotionConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocomotionConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
