use std::fmt;

use crate::value::TypedValue;

/// Ordered multicast of typed-value callbacks.
///
/// This is the point-to-point wiring between UX elements (a text field's
/// "send", a connector's "change"), as opposed to the broadcast [`EventBus`].
///
/// [`EventBus`]: crate::EventBus
#[derive(Default)]
pub struct DataSignal {
    callbacks: Vec<Box<dyn Fn(&TypedValue)>>,
}

impl DataSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, callback: impl Fn(&TypedValue) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Invoke every connected callback, in connection order.
    pub fn emit(&self, value: &TypedValue) {
        for callback in &self.callbacks {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for DataSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSignal")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
