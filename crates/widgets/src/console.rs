use std::collections::VecDeque;
use std::fmt;
use xrux_events::{DeviceAction, DeviceEvent, DeviceEventListener, DeviceEventType, TypedValue};

use crate::display::TextSink;

pub const DEFAULT_CONSOLE_LINES: usize = 20;

/// Scrolling text console, mostly for debugging inside the headset.
///
/// Holds at most `num_lines` lines; a new line past that scrolls the oldest
/// away. The rendered text always has `num_lines` rows, each ending in `\n`.
pub struct Console {
    num_lines: usize,
    lines: VecDeque<String>,
    accept_global: bool,
    sink: Option<Box<dyn TextSink>>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE_LINES)
    }
}

impl Console {
    pub fn new(num_lines: usize) -> Self {
        Self {
            num_lines,
            lines: VecDeque::with_capacity(num_lines),
            accept_global: true,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: impl TextSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self.commit();
        self
    }

    /// Whether `Console`/`Change` events from the bus are appended.
    pub fn set_accept_global(&mut self, accept: bool) {
        self.accept_global = accept;
    }

    pub fn accepts_global(&self) -> bool {
        self.accept_global
    }

    pub fn input(&mut self, value: &TypedValue) {
        self.push_line(value.as_string());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.commit();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        let mut text = String::new();
        for row in 0..self.num_lines {
            if let Some(line) = self.lines.get(row) {
                text.push_str(line);
            }
            text.push('\n');
        }
        text
    }

    fn push_line(&mut self, line: String) {
        if self.num_lines == 0 {
            return;
        }
        if self.lines.len() == self.num_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        self.commit();
    }

    fn commit(&mut self) {
        let text = self.text();
        if let Some(sink) = self.sink.as_mut() {
            sink.set_text(&text);
        }
    }
}

impl DeviceEventListener for Console {
    fn on_device_event(&mut self, event: &DeviceEvent) {
        if self.accept_global && event.is(DeviceEventType::Console, DeviceAction::Change) {
            self.push_line(event.data.as_string());
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("num_lines", &self.num_lines)
            .field("lines", &self.lines)
            .field("accept_global", &self.accept_global)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::SharedText;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;
    use xrux_events::EventBus;

    #[test]
    fn renders_every_row() {
        let view = SharedText::new();
        let mut console = Console::new(3).with_sink(view.clone());
        assert_eq!(view.text(), "\n\n\n");

        console.input(&TypedValue::from(7));
        console.input(&TypedValue::from(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(view.text(), "7\n1,2,3\n\n");
    }

    #[test]
    fn scrolls_when_full() {
        let mut console = Console::new(2);
        for word in ["a", "b", "c"] {
            console.input(&word.into());
        }
        assert_eq!(console.lines().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(console.text(), "b\nc\n");
    }

    #[test]
    fn clear_empties_and_redraws() {
        let view = SharedText::new();
        let mut console = Console::default().with_sink(view.clone());
        console.input(&true.into());
        console.clear();
        assert!(console.is_empty());
        assert_eq!(view.text(), "\n".repeat(DEFAULT_CONSOLE_LINES));
    }

    #[test]
    fn zero_lines_keeps_nothing() {
        let mut console = Console::new(0);
        console.input(&"x".into());
        assert!(console.is_empty());
        assert_eq!(console.text(), "");
    }

    #[test]
    fn bus_console_events_are_appended() {
        let bus = EventBus::new();
        let console = Rc::new(RefCell::new(Console::new(4)));
        bus.subscribe_listener(Rc::clone(&console));

        bus.publish(&DeviceEvent::new(
            DeviceEventType::Console,
            DeviceAction::Change,
            "from bus".into(),
        ));
        bus.publish(&DeviceEvent::click(DeviceEventType::RightGrip, true));
        assert_eq!(console.borrow().lines().collect::<Vec<_>>(), vec!["from bus"]);

        console.borrow_mut().set_accept_global(false);
        bus.publish(&DeviceEvent::new(
            DeviceEventType::Console,
            DeviceAction::Change,
            "ignored".into(),
        ));
        assert_eq!(console.borrow().len(), 1);
    }
}
