use xrux_events::{DataSignal, TypedValue};

/// Emits a fixed integer on demand, optionally once on the first frame.
#[derive(Debug, Default)]
pub struct IntegerSource {
    pub value: i32,
    pub send_on_start: bool,
    started: bool,
    on_change: DataSignal,
}

impl IntegerSource {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn send_on_start(mut self, send: bool) -> Self {
        self.send_on_start = send;
        self
    }

    pub fn on_change(&mut self) -> &mut DataSignal {
        &mut self.on_change
    }

    /// Per-frame hook; the first call sends if `send_on_start` is set.
    pub fn update(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if self.send_on_start {
            self.go();
        }
    }

    pub fn go(&self) {
        self.on_change.emit(&TypedValue::from(self.value));
    }
}

/// Wraps plain values as typed values and forwards them.
#[derive(Debug, Default)]
pub struct ToData {
    on_change: DataSignal,
}

impl ToData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&mut self) -> &mut DataSignal {
        &mut self.on_change
    }

    pub fn input(&self, value: impl Into<TypedValue>) {
        self.on_change.emit(&value.into());
    }
}
