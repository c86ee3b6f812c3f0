use xrux_events::{DeviceAction, DeviceEvent, DeviceEventType, EventBus, TypedValue};

/// Sends values to every console listening on the bus.
#[derive(Debug, Clone)]
pub struct ToConsole {
    bus: EventBus,
}

impl ToConsole {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn input(&self, value: &TypedValue) {
        self.bus.publish(&DeviceEvent::new(
            DeviceEventType::Console,
            DeviceAction::Change,
            value.clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn reaches_console_through_bus() {
        let bus = EventBus::new();
        let console = Rc::new(RefCell::new(Console::new(5)));
        bus.subscribe_listener(Rc::clone(&console));

        let forward = ToConsole::new(bus.clone());
        forward.input(&42.into());
        forward.input(&"done".into());

        assert_eq!(
            console.borrow().lines().collect::<Vec<_>>(),
            vec!["42", "done"]
        );
    }
}
