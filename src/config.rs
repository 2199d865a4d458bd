//! Runtime configuration.

use std::time::Duration;

/// Default window the update scheduler waits before flushing its queue.
pub const BATCH_UPDATE_INTERVAL: Duration = Duration::from_millis(16);

/// Default time budget of one frame in the render loop (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Tunables for one [`Runtime`](crate::Runtime).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Batching granularity of the update scheduler.
    pub flush_interval: Duration,
    /// How long the frame loop waits for input between two frames.
    pub frame_interval: Duration,
    /// Check primitive geometry props while reconciling.
    pub validate_primitives: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flush_interval: BATCH_UPDATE_INTERVAL,
            frame_interval: FRAME_INTERVAL,
            validate_primitives: false,
        }
    }
}

impl Config {
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn with_primitive_validation(mut self, validate: bool) -> Self {
        self.validate_primitives = validate;
        self
    }
}
