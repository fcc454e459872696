use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct PlaybackState {
    paused: bool,
    pending_steps: u32,
    pause_delay: Duration,
}

/// Pause/step/pacing switches shared between an observer and the driver.
///
/// Purely advisory: the driver asks between iterations, the observer never
/// calls into the driver.
#[derive(Debug, Clone)]
pub struct PlaybackControl {
    state: Arc<Mutex<PlaybackState>>,
}

impl PlaybackControl {
    pub fn new(pause_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlaybackState {
                paused: false,
                pending_steps: 0,
                pause_delay,
            })),
        }
    }

    pub fn pause(&self) {
        self.state.lock().paused = true;
    }

    pub fn resume(&self) {
        let mut state = self.state.lock();
        state.paused = false;
        state.pending_steps = 0;
    }

    /// Let exactly one more event through while paused.
    pub fn step(&self) {
        self.state.lock().pending_steps += 1;
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    /// Consume a pending step, if any.
    pub fn take_step(&self) -> bool {
        let mut state = self.state.lock();
        if state.pending_steps > 0 {
            state.pending_steps -= 1;
            true
        } else {
            false
        }
    }

    pub fn pause_delay(&self) -> Duration {
        self.state.lock().pause_delay
    }

    pub fn set_pause_delay(&self, delay: Duration) {
        self.state.lock().pause_delay = delay;
    }
}

impl Default for PlaybackControl {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
