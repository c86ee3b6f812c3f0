use std::cell::RefCell;
use std::rc::Rc;

/// Where a widget puts its rendered text. Implemented by the host text renderer.
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

/// A text sink backed by a shared string; clones see the same text.
#[derive(Debug, Clone, Default)]
pub struct SharedText(Rc<RefCell<String>>);

impl SharedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.0.borrow().clone()
    }
}

impl TextSink for SharedText {
    fn set_text(&mut self, text: &str) {
        let mut current = self.0.borrow_mut();
        current.clear();
        current.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_text() {
        let view = SharedText::new();
        let mut writer = view.clone();
        writer.set_text("hello");
        assert_eq!(view.text(), "hello");
        writer.set_text("");
        assert_eq!(view.text(), "");
    }
}
