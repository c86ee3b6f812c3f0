use serde::{Deserialize, Serialize};

/// Linear speed (distance per frame) at or below which the player counts as still.
pub const STILL_LINEAR_SPEED: f32 = 0.005;
/// Angular speed (degrees per frame) at or below which the player counts as still.
pub const STILL_ANGULAR_SPEED: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntiAliasing {
    None,
    TwoTimes,
    FourTimes,
    EightTimes,
}

impl AntiAliasing {
    /// MSAA sample count.
    pub fn samples(self) -> u8 {
        match self {
            Self::None => 0,
            Self::TwoTimes => 2,
            Self::FourTimes => 4,
            Self::EightTimes => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureQuality {
    Eighth,
    Quarter,
    Half,
    Full,
}

impl TextureQuality {
    /// Number of top mip levels skipped; full resolution skips none.
    pub fn mipmap_limit(self) -> u8 {
        match self {
            Self::Eighth => 3,
            Self::Quarter => 2,
            Self::Half => 1,
            Self::Full => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualQuality {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl VisualQuality {
    /// Eye texture resolution scale.
    pub fn render_scale(self) -> f32 {
        let index = match self {
            Self::Low => 0.0,
            Self::Medium => 1.0,
            Self::High => 2.0,
            Self::VeryHigh => 3.0,
        };
        index / 4.0 + 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowQuality {
    Disable,
    HardOnly,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowResolution {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// A named bundle of rendering-fidelity settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityPreset {
    pub anti_aliasing: AntiAliasing,
    pub texture_quality: TextureQuality,
    pub visual_quality: VisualQuality,
    pub shadow_quality: ShadowQuality,
    pub shadow_resolution: ShadowResolution,
}

impl QualityPreset {
    /// Cheap settings used while the player is moving.
    pub fn moving() -> Self {
        Self {
            anti_aliasing: AntiAliasing::None,
            texture_quality: TextureQuality::Eighth,
            visual_quality: VisualQuality::Medium,
            shadow_quality: ShadowQuality::Disable,
            shadow_resolution: ShadowResolution::Low,
        }
    }

    /// Full-fidelity settings used while the player stands still.
    pub fn standing() -> Self {
        Self {
            anti_aliasing: AntiAliasing::EightTimes,
            texture_quality: TextureQuality::Full,
            visual_quality: VisualQuality::High,
            shadow_quality: ShadowQuality::All,
            shadow_resolution: ShadowResolution::VeryHigh,
        }
    }

    /// The concrete values handed to the rendering backend.
    pub fn resolve(&self) -> AppliedQuality {
        AppliedQuality {
            anti_aliasing_level: self.anti_aliasing.samples(),
            texture_mipmap_limit: self.texture_quality.mipmap_limit(),
            render_scale: self.visual_quality.render_scale(),
            shadow_quality: self.shadow_quality,
            shadow_resolution: self.shadow_resolution,
        }
    }
}

/// Backend-ready quality values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AppliedQuality {
    /// One of 0, 2, 4, 8.
    pub anti_aliasing_level: u8,
    pub texture_mipmap_limit: u8,
    pub render_scale: f32,
    pub shadow_quality: ShadowQuality,
    pub shadow_resolution: ShadowResolution,
}

/// Applies quality values to the rendering pipeline. Implemented by the host.
pub trait QualityBackend {
    fn apply(&mut self, quality: &AppliedQuality);
}

/// Per-scene dynamic quality configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    pub dynamic_quality: bool,
    pub moving: QualityPreset,
    pub standing: QualityPreset,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            dynamic_quality: true,
            moving: QualityPreset::moving(),
            standing: QualityPreset::standing(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityMode {
    Moving,
    Standing,
}

/// Chooses between the moving and standing presets from motion state.
///
/// Starts in [`QualityMode::Moving`] with nothing applied, so the first still
/// frame applies the standing preset. Only transitions report a preset;
/// repeated frames in the same state do nothing.
#[derive(Debug, Clone)]
pub struct QualitySwitcher {
    settings: QualitySettings,
    mode: QualityMode,
}

impl QualitySwitcher {
    pub fn new(settings: QualitySettings) -> Self {
        Self {
            settings,
            mode: QualityMode::Moving,
        }
    }

    pub fn settings(&self) -> &QualitySettings {
        &self.settings
    }

    /// Replace the presets (scene load). The current mode is kept.
    pub fn set_settings(&mut self, settings: QualitySettings) {
        self.settings = settings;
    }

    pub fn mode(&self) -> QualityMode {
        self.mode
    }

    pub fn preset(&self, mode: QualityMode) -> &QualityPreset {
        match mode {
            QualityMode::Moving => &self.settings.moving,
            QualityMode::Standing => &self.settings.standing,
        }
    }

    /// Feed this frame's speeds. Returns the mode just switched to, if any.
    pub fn update(&mut self, linear_speed: f32, angular_speed: f32) -> Option<QualityMode> {
        if !self.settings.dynamic_quality {
            return None;
        }
        let still = linear_speed <= STILL_LINEAR_SPEED && angular_speed.abs() <= STILL_ANGULAR_SPEED;
        let wanted = if still {
            QualityMode::Standing
        } else {
            QualityMode::Moving
        };
        if wanted == self.mode {
            return None;
        }
        self.mode = wanted;
        Some(wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_resolution_tables() {
        let standing = QualityPreset::standing().resolve();
        assert_eq!(standing.anti_aliasing_level, 8);
        assert_eq!(standing.texture_mipmap_limit, 0);
        assert_eq!(standing.render_scale, 1.0);

        let moving = QualityPreset::moving().resolve();
        assert_eq!(moving.anti_aliasing_level, 0);
        assert_eq!(moving.texture_mipmap_limit, 3);
        assert_eq!(moving.render_scale, 0.75);
        assert_eq!(moving.shadow_quality, ShadowQuality::Disable);
    }

    #[test]
    fn anti_aliasing_levels() {
        let levels: Vec<u8> = [
            AntiAliasing::None,
            AntiAliasing::TwoTimes,
            AntiAliasing::FourTimes,
            AntiAliasing::EightTimes,
        ]
        .iter()
        .map(|a| a.samples())
        .collect();
        assert_eq!(levels, vec![0, 2, 4, 8]);
    }

    #[test]
    fn first_still_frame_switches_to_standing() {
        let mut switcher = QualitySwitcher::new(QualitySettings::default());
        assert_eq!(switcher.update(0.0, 0.0), Some(QualityMode::Standing));
        assert_eq!(switcher.mode(), QualityMode::Standing);
    }

    #[test]
    fn first_moving_frame_applies_nothing() {
        let mut switcher = QualitySwitcher::new(QualitySettings::default());
        assert_eq!(switcher.update(0.04, 0.0), None);
        assert_eq!(switcher.mode(), QualityMode::Moving);
    }

    #[test]
    fn switching_is_idempotent() {
        let mut switcher = QualitySwitcher::new(QualitySettings::default());
        assert!(switcher.update(0.0, 0.0).is_some());
        assert_eq!(switcher.update(0.001, 0.01), None);
        assert_eq!(switcher.update(0.005, 0.05), None);
        assert_eq!(switcher.update(0.006, 0.0), Some(QualityMode::Moving));
        assert_eq!(switcher.update(0.01, 0.0), None);
    }

    #[test]
    fn angular_motion_counts_as_moving() {
        let mut switcher = QualitySwitcher::new(QualitySettings::default());
        switcher.update(0.0, 0.0);
        assert_eq!(switcher.update(0.0, -0.2), Some(QualityMode::Moving));
    }

    #[test]
    fn disabled_dynamic_quality_never_switches() {
        let mut switcher = QualitySwitcher::new(QualitySettings {
            dynamic_quality: false,
            ..QualitySettings::default()
        });
        assert_eq!(switcher.update(0.0, 0.0), None);
        assert_eq!(switcher.update(1.0, 1.0), None);
    }
}
