use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use xrux_common::Hand;

use crate::value::TypedValue;

/// The device (or logical source) an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceEventType {
    LeftGrip,
    RightGrip,
    LeftTrigger,
    RightTrigger,
    LeftThumbstick,
    RightThumbstick,
    LeftPrimaryButton,
    RightPrimaryButton,
    LeftSecondaryButton,
    RightSecondaryButton,
    LeftMenu,
    RightMenu,
    /// Text destined for any console listening on the bus.
    Console,
    /// Application-defined events (proximity triggers, UX glue).
    Custom,
}

impl DeviceEventType {
    pub fn grip(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::LeftGrip,
            Hand::Right => Self::RightGrip,
        }
    }

    pub fn thumbstick(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::LeftThumbstick,
            Hand::Right => Self::RightThumbstick,
        }
    }

    /// The hand this source belongs to, if it is a hand controller.
    pub fn hand(self) -> Option<Hand> {
        match self {
            Self::LeftGrip
            | Self::LeftTrigger
            | Self::LeftThumbstick
            | Self::LeftPrimaryButton
            | Self::LeftSecondaryButton
            | Self::LeftMenu => Some(Hand::Left),
            Self::RightGrip
            | Self::RightTrigger
            | Self::RightThumbstick
            | Self::RightPrimaryButton
            | Self::RightSecondaryButton
            | Self::RightMenu => Some(Hand::Right),
            Self::Console | Self::Custom => None,
        }
    }
}

/// The gesture carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceAction {
    Click,
    Move,
    Change,
    Touch,
}

/// A discrete device event: consumed synchronously by every bus subscriber,
/// then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub event_type: DeviceEventType,
    pub action: DeviceAction,
    pub data: TypedValue,
}

impl DeviceEvent {
    pub fn new(event_type: DeviceEventType, action: DeviceAction, data: TypedValue) -> Self {
        Self {
            event_type,
            action,
            data,
        }
    }

    /// A button press (`true`) or release (`false`).
    pub fn click(event_type: DeviceEventType, pressed: bool) -> Self {
        Self::new(event_type, DeviceAction::Click, pressed.into())
    }

    /// A thumbstick deflection for the given hand.
    pub fn thumbstick(hand: Hand, axis: Vec2) -> Self {
        Self::new(
            DeviceEventType::thumbstick(hand),
            DeviceAction::Move,
            Vec3::new(axis.x, axis.y, 0.0).into(),
        )
    }

    pub fn is(&self, event_type: DeviceEventType, action: DeviceAction) -> bool {
        self.event_type == event_type && self.action == action
    }

    /// Boolean view of the payload.
    pub fn event_bool(&self) -> bool {
        self.data.as_bool()
    }

    /// Two-axis view of the payload (x and y of the vector coercion).
    pub fn event_vector(&self) -> Vec2 {
        self.data.as_vector3().truncate()
    }
}
