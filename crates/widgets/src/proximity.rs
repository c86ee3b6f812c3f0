use glam::Vec3;
use xrux_events::{DeviceAction, DeviceEvent, DeviceEventType, EventBus, TypedValue};

pub const DEFAULT_PROXIMITY_DISTANCE: f32 = 2.0;

/// Publishes an event when the camera comes within `distance`.
///
/// Fires once per approach: it re-arms only after the camera has left the radius.
#[derive(Debug, Clone)]
pub struct ProximityTrigger {
    pub position: Vec3,
    pub distance: f32,
    event_type: DeviceEventType,
    action: DeviceAction,
    data: TypedValue,
    triggered: bool,
    bus: EventBus,
}

impl ProximityTrigger {
    pub fn new(
        bus: EventBus,
        position: Vec3,
        event_type: DeviceEventType,
        action: DeviceAction,
    ) -> Self {
        Self {
            position,
            distance: DEFAULT_PROXIMITY_DISTANCE,
            event_type,
            action,
            data: TypedValue::from(""),
            triggered: false,
            bus,
        }
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Payload sent with the next activation.
    pub fn input(&mut self, data: &TypedValue) {
        self.data = data.clone();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Per-frame check against the camera position; `None` when there is no camera.
    pub fn update(&mut self, camera: Option<Vec3>) {
        let Some(camera) = camera else {
            return;
        };
        let near = camera.distance(self.position) <= self.distance;
        if near && !self.triggered {
            self.triggered = true;
            tracing::debug!(event_type = ?self.event_type, "proximity trigger fired");
            self.bus.publish(&DeviceEvent::new(
                self.event_type,
                self.action,
                self.data.clone(),
            ));
        } else if !near && self.triggered {
            self.triggered = false;
        }
    }
}
