//! Wall-clock sampling for frame-driven animation

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, or 0 if the system clock is before it.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Per-frame wall clock.
///
/// Call [`tick`](Self::tick) once per rendered frame; the sampled
/// [`now_millis`](Self::now_millis) value is what the skybox animation
/// scheduler consumes.
pub struct WallClock {
    origin_millis: u64,
    origin: Instant,
    last_frame: Instant,
}

impl WallClock {
    /// Create a new clock anchored at the current system time
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin_millis: unix_millis(),
            origin: now,
            last_frame: now,
        }
    }

    /// Sample the clock; call once per frame before dispatching.
    pub fn tick(&mut self) -> u64 {
        self.last_frame = Instant::now();
        self.now_millis()
    }

    /// Milliseconds since the Unix epoch at the last [`tick`](Self::tick).
    ///
    /// Monotonic: derived from an [`Instant`] offset, so system clock
    /// adjustments never move it backwards.
    pub fn now_millis(&self) -> u64 {
        let elapsed = self.last_frame - self.origin;
        self.origin_millis + elapsed.as_millis() as u64
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}
