use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ConfigError;
use crate::quality::QualitySettings;

/// A named object in the loaded scene, as seen by the locomotion controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Quality overrides attached to the object, if it carries any.
    #[serde(default)]
    pub settings: Option<QualitySettings>,
}

/// Finds scene objects by name. Implemented by the host scene graph.
pub trait SceneLookup {
    fn find_named_object(&self, name: &str) -> Option<&SceneObject>;
}

/// Where the active quality settings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SettingsSource {
    Scene,
    Defaults,
}

/// Look up `name` and take its quality settings; fall back to `defaults`
/// when the object is absent or carries no settings.
pub fn resolve_scene_settings(
    scene: &dyn SceneLookup,
    name: &str,
    defaults: &QualitySettings,
) -> (QualitySettings, SettingsSource) {
    match scene.find_named_object(name) {
        Some(SceneObject {
            settings: Some(settings),
        }) => {
            tracing::info!(object = name, "using scene quality settings");
            (*settings, SettingsSource::Scene)
        }
        Some(_) => {
            tracing::debug!(object = name, "scene object has no settings, using defaults");
            (*defaults, SettingsSource::Defaults)
        }
        None => {
            tracing::debug!(object = name, "scene object not found, using defaults");
            (*defaults, SettingsSource::Defaults)
        }
    }
}

/// In-memory scene object table, loadable from YAML.
///
/// BTreeMap keeps iteration (and serialized output) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneRegistry {
    objects: BTreeMap<String, SceneObject>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, object: SceneObject) {
        self.objects.insert(name.into(), object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }
}

impl SceneLookup for SceneRegistry {
    fn find_named_object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{AntiAliasing, QualityPreset};

    fn custom_settings() -> QualitySettings {
        QualitySettings {
            dynamic_quality: false,
            moving: QualityPreset {
                anti_aliasing: AntiAliasing::TwoTimes,
                ..QualityPreset::moving()
            },
            standing: QualityPreset::standing(),
        }
    }

    #[test]
    fn missing_object_falls_back() {
        let scene = SceneRegistry::new();
        let defaults = QualitySettings::default();
        let (settings, source) = resolve_scene_settings(&scene, "ENTRY", &defaults);
        assert_eq!(settings, defaults);
        assert_eq!(source, SettingsSource::Defaults);
    }

    #[test]
    fn object_without_settings_falls_back() {
        let mut scene = SceneRegistry::new();
        scene.insert("ENTRY", SceneObject::default());
        let defaults = QualitySettings::default();
        let (settings, source) = resolve_scene_settings(&scene, "ENTRY", &defaults);
        assert_eq!(settings, defaults);
        assert_eq!(source, SettingsSource::Defaults);
    }

    #[test]
    fn object_with_settings_wins() {
        let mut scene = SceneRegistry::new();
        scene.insert(
            "ENTRY",
            SceneObject {
                settings: Some(custom_settings()),
            },
        );
        let (settings, source) =
            resolve_scene_settings(&scene, "ENTRY", &QualitySettings::default());
        assert_eq!(settings, custom_settings());
        assert_eq!(source, SettingsSource::Scene);
    }

    #[test]
    fn lookup_is_by_exact_name() {
        let mut scene = SceneRegistry::new();
        scene.insert(
            "Entry",
            SceneObject {
                settings: Some(custom_settings()),
            },
        );
        let (_, source) = resolve_scene_settings(&scene, "ENTRY", &QualitySettings::default());
        assert_eq!(source, SettingsSource::Defaults);
    }

    #[test]
    fn registry_from_yaml() {
        let yaml = "\
ENTRY:
  settings:
    dynamic_quality: false
Lamp: {}
";
        let scene = SceneRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(scene.len(), 2);
        let entry = scene.find_named_object("ENTRY").unwrap();
        assert!(!entry.settings.unwrap().dynamic_quality);
        assert!(scene.find_named_object("Lamp").unwrap().settings.is_none());
    }
}
