//! Locomotion: moves the player rig under user control.
//!
//! # Invariants
//! - Velocity magnitude never exceeds the configured cap after integration.
//! - Teleport fades run Idle -> FadingIn -> FadingOut -> Idle, one state per frame at most.
//! - The position jump of a teleport happens while the fader is fully opaque.
//! - All timers are driven by the `dt` passed to [`LocomotionController::step`]; there is no
//!   ambient clock.
//! - Missing optional collaborators (fader, head, pointers, instructions, quality backend)
//!   disable the behaviour that needs them; they never cause errors.

mod config;
mod controller;
mod fade;
mod input;
mod probe;
mod quality;
mod rig;
mod scene;

pub use config::{ConfigError, LocomotionConfig, MovementPointer, MovementStyle, RotationStyle};
pub use controller::{LocomotionController, LocomotionControllerBuilder, LocomotionState};
pub use fade::{FadeFrame, FadeState, Fader, TeleportFade};
pub use probe::{Aabb, Collider, GroundProbe, StaticWorld, WorldProbe};
pub use quality::{
    AntiAliasing, AppliedQuality, QualityBackend, QualityMode, QualityPreset, QualitySettings,
    QualitySwitcher, ShadowQuality, ShadowResolution, TextureQuality, VisualQuality,
};
pub use rig::{DesktopInput, DesktopState, MarkerState, PointerState, Visibility, XrMode};
pub use scene::{SceneLookup, SceneObject, SceneRegistry, SettingsSource, resolve_scene_settings};

pub fn crate_info() -> &'static str {
    "xrux-locomotion v0.1.0"
}
