use glam::{Vec2, Vec3};
use xrux_common::Hand;
use xrux_events::{DeviceAction, DeviceEvent, DeviceEventListener, DeviceEventType};

use crate::config::MovementPointer;
use crate::controller::LocomotionController;
use crate::rig::XrMode;

/// Stick deflection needed before an axis counts.
const STICK_DEADZONE: f32 = 0.5;
const TURN_ACCELERATION: f32 = 0.1;
const MOVE_ACCELERATION: f32 = 0.01;

impl DeviceEventListener for LocomotionController {
    fn on_device_event(&mut self, event: &DeviceEvent) {
        self.handle_grip(event, Hand::Left);
        self.handle_grip(event, Hand::Right);

        let movement_hand = self.config.movement_hand;
        if event.is(
            DeviceEventType::thumbstick(movement_hand),
            DeviceAction::Move,
        ) {
            self.handle_movement_stick(event.event_vector());
        }

        if self.config.other_thumbstick_for_height {
            if event.is(
                DeviceEventType::thumbstick(movement_hand.other()),
                DeviceAction::Move,
            ) {
                self.handle_height_stick(event.event_vector());
            } else {
                // vertical motion only while the height stick is held
                self.state.acceleration.y = 0.0;
            }
        } else if self.state.acceleration.y > 0.0 && !self.state.flying {
            self.start_flying();
        }
    }
}

impl LocomotionController {
    fn handle_grip(&mut self, event: &DeviceEvent, hand: Hand) {
        if !event.is(DeviceEventType::grip(hand), DeviceAction::Click) {
            return;
        }
        self.dismiss_instructions();
        if !event.event_bool() {
            return;
        }
        if self.state.moving_to_target && self.state.fade.is_active() {
            tracing::debug!(?hand, "grip ignored during teleport fade");
            return;
        }

        let target = match self.xr_mode {
            XrMode::Desktop => self
                .desktop
                .is_moving_to
                .then_some(self.desktop.marker.position),
            XrMode::Immersive => self
                .pointer(hand)
                .filter(|pointer| pointer.is_moving_to)
                .map(|pointer| pointer.marker),
        };
        match target {
            Some(target) => self.begin_move(target),
            None => self.cancel_move(),
        }
    }

    fn handle_movement_stick(&mut self, stick: Vec2) {
        self.dismiss_instructions();

        self.state.angular_acceleration = if stick.x.abs() > STICK_DEADZONE {
            stick.x.signum() * TURN_ACCELERATION
        } else {
            0.0
        };

        if stick.y.abs() > STICK_DEADZONE {
            self.state.acceleration = self
                .movement_forward()
                .map(|forward| forward * stick.y.signum() * MOVE_ACCELERATION)
                .unwrap_or(Vec3::ZERO);
            self.state.hit_friction = 0.0;
            self.cancel_move();
        } else {
            self.state.acceleration = Vec3::ZERO;
        }
    }

    fn handle_height_stick(&mut self, stick: Vec2) {
        self.dismiss_instructions();

        self.state.acceleration.y = if stick.y.abs() > STICK_DEADZONE {
            stick.y.signum() * MOVE_ACCELERATION
        } else {
            0.0
        };
        if self.state.acceleration.y > 0.0 && !self.state.flying {
            self.start_flying();
        }
    }

    fn movement_forward(&self) -> Option<Vec3> {
        match self.config.movement_pointer {
            MovementPointer::Head => self.head_forward(),
            MovementPointer::Controller => self
                .pointer(self.config.movement_hand)
                .map(|pointer| pointer.forward),
        }
    }
}
