use serde::{Deserialize, Serialize};

/// Screen fader shown during a teleport. Implemented by the host.
pub trait Fader {
    fn set_active(&mut self, active: bool);
    /// Opacity in `[0, 1]`; 1 hides the scene completely.
    fn set_opacity(&mut self, opacity: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FadeState {
    #[default]
    Idle,
    /// Opacity rising 0 -> 1 over the first half of the fade.
    FadingIn,
    /// Opacity falling 1 -> 0 over the second half; the rig is at the destination.
    FadingOut,
}

/// What one frame of a fade asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeFrame {
    pub opacity: f32,
    pub state: FadeState,
    /// The rig should be placed at the teleport destination this frame.
    pub at_destination: bool,
}

/// Teleport fade timer.
///
/// Timestamps are controller clock values. The state moves forward by at
/// most one step per [`advance`](Self::advance), so a long frame never skips
/// FadingOut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportFade {
    duration: f32,
    started_at: f32,
    state: FadeState,
}

impl TeleportFade {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            started_at: 0.0,
            state: FadeState::Idle,
        }
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != FadeState::Idle
    }

    /// Change the duration used by the next fade.
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
    }

    pub fn begin(&mut self, now: f32) {
        self.started_at = now;
        self.state = FadeState::FadingIn;
    }

    pub fn cancel(&mut self) {
        self.state = FadeState::Idle;
    }

    /// Elapsed fraction of the fade at `now`.
    pub fn progress(&self, now: f32) -> f32 {
        (now - self.started_at) / self.duration
    }

    pub fn advance(&mut self, now: f32) -> FadeFrame {
        let t = self.progress(now);
        match self.state {
            FadeState::Idle => FadeFrame {
                opacity: 0.0,
                state: FadeState::Idle,
                at_destination: false,
            },
            FadeState::FadingIn if t < 0.5 => FadeFrame {
                opacity: (t * 2.0).clamp(0.0, 1.0),
                state: FadeState::FadingIn,
                at_destination: false,
            },
            FadeState::FadingIn => {
                self.state = FadeState::FadingOut;
                FadeFrame {
                    opacity: fading_out_opacity(t),
                    state: FadeState::FadingOut,
                    at_destination: true,
                }
            }
            FadeState::FadingOut if t < 1.0 => FadeFrame {
                opacity: fading_out_opacity(t),
                state: FadeState::FadingOut,
                at_destination: true,
            },
            FadeState::FadingOut => {
                self.state = FadeState::Idle;
                FadeFrame {
                    opacity: 0.0,
                    state: FadeState::Idle,
                    at_destination: true,
                }
            }
        }
    }
}

fn fading_out_opacity(t: f32) -> f32 {
    (1.0 - (t - 0.5) * 2.0).clamp(0.0, 1.0)
}
