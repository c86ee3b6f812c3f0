use std::fmt;
use xrux_events::{DataSignal, TypedValue};

use crate::display::TextSink;

/// A single text display that can send its contents on.
///
/// Without a display the field holds no text and `send` emits nothing.
#[derive(Default)]
pub struct TextField {
    display: Option<Box<dyn TextSink>>,
    text: String,
    on_send: DataSignal,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(mut self, display: impl TextSink + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Callbacks receiving the text on [`send`](Self::send).
    pub fn on_send(&mut self) -> &mut DataSignal {
        &mut self.on_send
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the displayed text.
    pub fn input(&mut self, value: &TypedValue) {
        self.show(value.as_string());
    }

    pub fn clear(&mut self) {
        self.show(String::new());
    }

    pub fn send(&self) {
        if self.display.is_some() {
            self.on_send.emit(&TypedValue::from(self.text.as_str()));
        }
    }

    fn show(&mut self, text: String) {
        if let Some(display) = self.display.as_mut() {
            display.set_text(&text);
            self.text = text;
        }
    }
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField")
            .field("text", &self.text)
            .field("has_display", &self.display.is_some())
            .field("on_send", &self.on_send)
            .finish()
    }
}
