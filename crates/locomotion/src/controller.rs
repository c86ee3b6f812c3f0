use glam::{Quat, Vec3};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use xrux_common::{Hand, Layer, LayerMask, Transform};
use xrux_events::{EventBus, SubscriptionId, TypedValue};

use crate::config::{ConfigError, LocomotionConfig, MovementStyle, RotationStyle};
use crate::fade::{FadeState, Fader, TeleportFade};
use crate::probe::{GroundProbe, WorldProbe};
use crate::quality::{QualityBackend, QualityMode, QualitySettings, QualitySwitcher};
use crate::rig::{DesktopInput, DesktopState, PointerState, Visibility, XrMode};
use crate::scene::{SceneLookup, SettingsSource, resolve_scene_settings};

/// Minimum time between two stepped turns.
const STEP_INTERVAL: f32 = 0.5;
/// Time after take-off during which ground contact does not end a flight.
const FLIGHT_GRACE: f32 = 0.5;
const BRAKE_FRICTION: f32 = 5.0;
/// Numerator of the slide damping term `k / (1 + distance)`.
const SLIDE_DAMPING: f32 = 20.0;
/// Distance at which a slide snaps onto its target.
const SLIDE_ARRIVAL_DISTANCE: f32 = 1e-3;
/// Turn input magnitude below which the stick counts as neutral.
const TURN_THRESHOLD: f32 = 0.001;
/// How far above the rig `stand_on_ground` starts looking for ground.
const GROUND_SEARCH_LIFT: f32 = 1.0;

/// Mutable per-controller movement state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocomotionState {
    /// Rig (feet) position.
    pub position: Vec3,
    /// Heading in degrees about +Y, in `[0, 360)`.
    pub yaw: f32,
    /// Displacement per frame.
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Degrees per frame, used by smooth rotation.
    pub angular_velocity: f32,
    pub angular_acceleration: f32,
    /// Extra friction from braking or approaching a slide target.
    pub hit_friction: f32,
    pub movement_style: MovementStyle,
    pub rotation_style: RotationStyle,
    pub fade: TeleportFade,
    pub flying: bool,
    pub start_flying_time: f32,
    pub angular_step_time: f32,
    pub quality_mode: QualityMode,
    pub moving_to_target: bool,
    pub target: Vec3,
    /// Sum of every `dt` passed to `step`.
    pub clock: f32,
}

impl LocomotionState {
    fn new(config: &LocomotionConfig, position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            hit_friction: 0.0,
            movement_style: config.movement_style,
            rotation_style: config.rotation_style,
            fade: TeleportFade::new(config.teleport_fade_time),
            flying: false,
            start_flying_time: 0.0,
            angular_step_time: -STEP_INTERVAL,
            quality_mode: QualityMode::Moving,
            moving_to_target: false,
            target: position,
            clock: 0.0,
        }
    }
}

/// Moves the player rig from device events and a per-frame `step`.
///
/// Event handling lives in the [`DeviceEventListener`](xrux_events::DeviceEventListener)
/// impl; wire it to a bus with [`attach`](Self::attach).
pub struct LocomotionController {
    pub(crate) config: LocomotionConfig,
    pub(crate) state: LocomotionState,
    world: Box<dyn WorldProbe>,
    pub(crate) xr_mode: XrMode,
    height: f32,
    fader: Option<Box<dyn Fader>>,
    instructions: Option<Box<dyn Visibility>>,
    quality_backend: Option<Box<dyn QualityBackend>>,
    quality: QualitySwitcher,
    settings_source: SettingsSource,
    head: Option<Transform>,
    left_pointer: Option<PointerState>,
    right_pointer: Option<PointerState>,
    pub(crate) desktop: DesktopState,
    desktop_input: Option<DesktopInput>,
    moved: bool,
}

pub struct LocomotionControllerBuilder {
    config: LocomotionConfig,
    world: Box<dyn WorldProbe>,
    xr_mode: XrMode,
    fader: Option<Box<dyn Fader>>,
    instructions: Option<Box<dyn Visibility>>,
    quality_backend: Option<Box<dyn QualityBackend>>,
    position: Vec3,
    yaw: f32,
}

impl LocomotionControllerBuilder {
    pub fn xr_mode(mut self, mode: XrMode) -> Self {
        self.xr_mode = mode;
        self
    }

    pub fn fader(mut self, fader: impl Fader + 'static) -> Self {
        self.fader = Some(Box::new(fader));
        self
    }

    pub fn instructions(mut self, instructions: impl Visibility + 'static) -> Self {
        self.instructions = Some(Box::new(instructions));
        self
    }

    pub fn quality_backend(mut self, backend: impl QualityBackend + 'static) -> Self {
        self.quality_backend = Some(Box::new(backend));
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Initial heading in degrees.
    pub fn yaw(mut self, degrees: f32) -> Self {
        self.yaw = degrees;
        self
    }

    pub fn build(self) -> Result<LocomotionController, ConfigError> {
        self.config.validate()?;
        let state = LocomotionState::new(&self.config, self.position, self.yaw);
        Ok(LocomotionController {
            height: self.config.height,
            quality: QualitySwitcher::new(self.config.quality),
            config: self.config,
            state,
            world: self.world,
            xr_mode: self.xr_mode,
            fader: self.fader,
            instructions: self.instructions,
            quality_backend: self.quality_backend,
            settings_source: SettingsSource::Defaults,
            head: None,
            left_pointer: None,
            right_pointer: None,
            desktop: DesktopState::default(),
            desktop_input: None,
            moved: false,
        })
    }
}

impl LocomotionController {
    pub fn builder(
        config: LocomotionConfig,
        world: impl WorldProbe + 'static,
    ) -> LocomotionControllerBuilder {
        LocomotionControllerBuilder {
            config,
            world: Box::new(world),
            xr_mode: XrMode::Immersive,
            fader: None,
            instructions: None,
            quality_backend: None,
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    /// Subscribe a shared controller to `bus`.
    pub fn attach(this: &Rc<RefCell<Self>>, bus: &EventBus) -> SubscriptionId {
        bus.subscribe_listener(Rc::clone(this))
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn xr_mode(&self) -> XrMode {
        self.xr_mode
    }

    /// Body height used when no head pose is tracked.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn quality_mode(&self) -> QualityMode {
        self.state.quality_mode
    }

    /// Quality settings in effect for the current scene.
    pub fn quality_settings(&self) -> &QualitySettings {
        self.quality.settings()
    }

    pub fn settings_source(&self) -> SettingsSource {
        self.settings_source
    }

    pub fn desktop(&self) -> &DesktopState {
        &self.desktop
    }

    /// Whether movement input has been seen (and the instructions hidden).
    pub fn instructions_dismissed(&self) -> bool {
        self.moved
    }

    /// World transform of the rig.
    pub fn transform(&self) -> Transform {
        Transform {
            position: self.state.position,
            rotation: Quat::from_rotation_y(self.state.yaw.to_radians()),
            scale: Vec3::ONE,
        }
    }

    /// World pose of the tracked head, or `None` when untracked.
    pub fn set_head_pose(&mut self, head: Option<Transform>) {
        self.head = head;
    }

    pub fn set_pointer(&mut self, hand: Hand, pointer: Option<PointerState>) {
        match hand {
            Hand::Left => self.left_pointer = pointer,
            Hand::Right => self.right_pointer = pointer,
        }
    }

    pub fn pointer(&self, hand: Hand) -> Option<&PointerState> {
        match hand {
            Hand::Left => self.left_pointer.as_ref(),
            Hand::Right => self.right_pointer.as_ref(),
        }
    }

    pub fn set_desktop_input(&mut self, input: Option<DesktopInput>) {
        self.desktop_input = input;
    }

    /// Eye height above the rig: from the head pose when tracked, else the body height.
    pub fn head_height(&self) -> f32 {
        self.head
            .map(|head| head.position.y - self.state.position.y)
            .unwrap_or(self.height)
    }

    /// Forward direction of the head, if one is known.
    pub(crate) fn head_forward(&self) -> Option<Vec3> {
        if let Some(head) = self.head {
            return Some(head.forward());
        }
        match self.xr_mode {
            XrMode::Desktop => Some(self.transform().rotation * self.desktop.head_look * Vec3::Z),
            XrMode::Immersive => None,
        }
    }

    /// Scene start: reset the fader, show instructions, settle on the ground
    /// and pick up the scene's quality settings.
    pub fn start(&mut self, scene: &dyn SceneLookup) {
        if self.xr_mode == XrMode::Immersive {
            self.height = 0.0;
        }
        if let Some(fader) = self.fader.as_mut() {
            fader.set_opacity(0.0);
            fader.set_active(false);
        }
        if let Some(instructions) = self.instructions.as_mut() {
            instructions.set_visible(true);
        }
        self.stand_on_ground();
        self.on_scene_loaded(scene);
        tracing::debug!(mode = ?self.xr_mode, position = ?self.state.position, "locomotion started");
    }

    /// Re-resolve the quality presets for a newly loaded scene.
    pub fn on_scene_loaded(&mut self, scene: &dyn SceneLookup) -> SettingsSource {
        let (settings, source) = resolve_scene_settings(
            scene,
            &self.config.scene_settings_object_name,
            &self.config.quality,
        );
        self.quality.set_settings(settings);
        self.settings_source = source;
        source
    }

    /// Drop the rig onto walkable ground below it, if there is any.
    pub fn stand_on_ground(&mut self) {
        let origin = self.state.position + Vec3::Y * GROUND_SEARCH_LIFT;
        if let Some(hit) = self.world.raycast(
            origin,
            Vec3::NEG_Y,
            self.height + GROUND_SEARCH_LIFT,
            LayerMask::only(Layer::Walkable),
        ) {
            self.state.position = hit.point;
        }
        if self.xr_mode == XrMode::Desktop {
            self.desktop.hide_marker(self.state.position);
        }
    }

    /// Damp all movement until fresh input arrives.
    pub fn put_on_brakes(&mut self) {
        self.state.hit_friction = BRAKE_FRICTION;
    }

    /// 0 selects sliding, anything else teleporting.
    pub fn set_movement_style(&mut self, selection: &TypedValue) {
        self.state.movement_style = if selection.as_int() == 0 {
            MovementStyle::Slide
        } else {
            MovementStyle::Teleport
        };
        tracing::debug!(style = ?self.state.movement_style, "movement style set");
    }

    /// 0 selects stepped rotation, anything else smooth.
    pub fn set_rotation_style(&mut self, selection: &TypedValue) {
        self.state.rotation_style = if selection.as_int() == 0 {
            RotationStyle::Stepped
        } else {
            RotationStyle::Smooth
        };
        tracing::debug!(style = ?self.state.rotation_style, "rotation style set");
    }

    /// Stepped rotation angle in degrees.
    pub fn set_rotation_angle(&mut self, angle: &TypedValue) {
        self.config.stepping_angle = angle.as_float();
    }

    /// Advance one frame of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let _span = tracing::trace_span!("locomotion_step", dt).entered();
        self.state.clock += dt;
        let now = self.state.clock;

        if self.state.moving_to_target {
            match self.state.movement_style {
                MovementStyle::Teleport => self.advance_teleport(now),
                MovementStyle::Slide => self.advance_slide(dt),
            }
        }

        self.integrate(dt, now);
        self.update_quality();
        self.rotate(dt, now);

        if let (XrMode::Desktop, Some(input)) = (self.xr_mode, self.desktop_input) {
            self.desktop.update(&input, &*self.world, self.state.position);
        }

        tracing::trace!(
            position = ?self.state.position,
            velocity = ?self.state.velocity,
            yaw = self.state.yaw,
            "locomotion step"
        );
    }

    fn advance_teleport(&mut self, now: f32) {
        let s = &mut self.state;
        match self.fader.as_mut() {
            Some(fader) if s.fade.is_active() => {
                let frame = s.fade.advance(now);
                fader.set_opacity(frame.opacity);
                if frame.at_destination {
                    s.position = s.target;
                }
                if frame.state == FadeState::Idle {
                    fader.set_active(false);
                    s.moving_to_target = false;
                    tracing::debug!(position = ?s.position, "teleport fade complete");
                }
            }
            _ => {
                s.position = s.target;
                s.moving_to_target = false;
                s.fade.cancel();
                tracing::debug!(position = ?s.position, "teleported");
            }
        }
        s.acceleration = Vec3::ZERO;
        s.velocity = Vec3::ZERO;
        s.hit_friction = 0.0;
    }

    fn advance_slide(&mut self, dt: f32) {
        let s = &mut self.state;
        let to_target = s.target - s.position;
        let distance = to_target.length();
        s.acceleration = to_target * dt;
        s.hit_friction = SLIDE_DAMPING / (1.0 + distance);
        if distance < SLIDE_ARRIVAL_DISTANCE {
            s.position = s.target;
            s.moving_to_target = false;
            s.acceleration = Vec3::ZERO;
            s.velocity = Vec3::ZERO;
            s.hit_friction = 0.0;
            tracing::debug!(position = ?s.position, "slide target reached");
        }
    }

    fn integrate(&mut self, dt: f32, now: f32) {
        let probe = GroundProbe::new(&*self.world, self.head_height());
        let cfg = &self.config;
        let s = &mut self.state;

        let delta_v = s.acceleration * cfg.acceleration_factor * dt;
        let friction = s.velocity * (0.5 + s.hit_friction) * cfg.friction_factor * dt;
        s.velocity = (s.velocity + delta_v - friction).clamp_length_max(cfg.maximum_velocity);

        let mut candidate = s.position + s.velocity;
        candidate.y = candidate.y.clamp(0.0, cfg.maximum_flying_height);

        if s.flying {
            if probe.blocked_ahead(s.position, s.velocity) {
                s.velocity = Vec3::ZERO;
                s.acceleration = Vec3::ZERO;
                return;
            }
            s.position = candidate;
            let grounded = probe.ground_offset(candidate).is_some();
            if now - s.start_flying_time > FLIGHT_GRACE && grounded {
                s.flying = false;
                tracing::debug!(position = ?s.position, "landed");
            }
        } else if probe.blocked_below(s.position, s.velocity)
            || probe.blocked_ahead(s.position, s.velocity)
        {
            s.velocity = Vec3::ZERO;
            s.acceleration = Vec3::ZERO;
        } else {
            s.position = match probe.ground_offset(candidate) {
                Some(offset) => candidate + Vec3::Y * offset,
                None => candidate,
            };
        }
    }

    fn update_quality(&mut self) {
        let linear = self.state.velocity.length();
        let Some(mode) = self.quality.update(linear, self.state.angular_velocity) else {
            return;
        };
        self.state.quality_mode = mode;
        let applied = self.quality.preset(mode).resolve();
        tracing::info!(
            ?mode,
            anti_aliasing = applied.anti_aliasing_level,
            mipmap_limit = applied.texture_mipmap_limit,
            render_scale = applied.render_scale,
            "quality preset applied"
        );
        if let Some(backend) = self.quality_backend.as_mut() {
            backend.apply(&applied);
        }
    }

    fn rotate(&mut self, dt: f32, now: f32) {
        let cfg = &self.config;
        let s = &mut self.state;
        s.angular_velocity += s.angular_acceleration * dt * cfg.rotation_acceleration_factor
            - s.angular_velocity * dt * cfg.rotation_friction_factor;

        match s.rotation_style {
            RotationStyle::Stepped => {
                if s.angular_acceleration.abs() <= TURN_THRESHOLD {
                    // next press turns at once
                    s.angular_step_time = now - STEP_INTERVAL;
                } else if now - s.angular_step_time >= STEP_INTERVAL {
                    s.yaw += cfg.stepping_angle * s.angular_acceleration.signum();
                    s.angular_step_time = now;
                }
            }
            RotationStyle::Smooth => s.yaw += s.angular_velocity,
        }
        s.yaw = s.yaw.rem_euclid(360.0);
    }

    /// Start a teleport or slide to `target`.
    pub(crate) fn begin_move(&mut self, target: Vec3) {
        let now = self.state.clock;
        self.state.moving_to_target = true;
        self.state.target = target;
        if self.state.movement_style == MovementStyle::Teleport {
            if let Some(fader) = self.fader.as_mut() {
                fader.set_active(true);
            }
            self.state.fade.set_duration(self.config.teleport_fade_time);
            self.state.fade.begin(now);
        }
        tracing::debug!(?target, style = ?self.state.movement_style, "move to target");
    }

    /// Abandon any teleport or slide in progress.
    pub(crate) fn cancel_move(&mut self) {
        if !self.state.moving_to_target {
            return;
        }
        if let Some(fader) = self.fader.as_mut() {
            fader.set_active(false);
        }
        self.state.moving_to_target = false;
        self.state.fade.cancel();
        tracing::debug!("move to target cancelled");
    }

    pub(crate) fn start_flying(&mut self) {
        self.state.flying = true;
        self.state.start_flying_time = self.state.clock;
        self.state.hit_friction = 0.0;
        self.cancel_move();
        tracing::debug!(position = ?self.state.position, "take-off");
    }

    pub(crate) fn dismiss_instructions(&mut self) {
        if self.moved {
            return;
        }
        self.moved = true;
        if let Some(instructions) = self.instructions.as_mut() {
            instructions.set_visible(false);
        }
    }
}

impl fmt::Debug for LocomotionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocomotionController")
            .field("xr_mode", &self.xr_mode)
            .field("height", &self.height)
            .field("state", &self.state)
            .field("has_fader", &self.fader.is_some())
            .field("has_instructions", &self.instructions.is_some())
            .field("has_quality_backend", &self.quality_backend.is_some())
            .finish()
    }
}
