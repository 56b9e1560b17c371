//! Wall-clock frame stepping for multi-frame skyboxes.
//!
//! Independent of the day clock and of visibility: an animated skybox keeps
//! advancing while faded out.

/// Frame interval used when the configured fps is out of range.
pub const DEFAULT_FRAME_INTERVAL_MILLIS: u64 = 16;

/// Highest accepted frames-per-second value.
pub const MAX_FPS: f32 = 360.0;

/// Milliseconds per frame for `fps` in `(0, MAX_FPS]`, else the default.
pub fn frame_interval_millis(fps: f32) -> u64 {
    if fps > 0.0 && fps <= MAX_FPS {
        (1000.0 / fps) as u64
    } else {
        DEFAULT_FRAME_INTERVAL_MILLIS
    }
}

/// Position within a frame list plus the time of the last switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationCursor {
    index: usize,
    last_switch: Option<u64>,
}

impl AnimationCursor {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Wall-clock millis of the last frame switch, `None` before the first tick.
    #[inline]
    pub fn last_switch(&self) -> Option<u64> {
        self.last_switch
    }

    /// Select the active frame at `now_millis`, advancing once the interval elapsed.
    ///
    /// Returns `None` only for an empty frame list.
    pub fn tick<'a, T>(&mut self, frames: &'a [T], interval_millis: u64, now_millis: u64) -> Option<&'a T> {
        if frames.is_empty() {
            return None;
        }

        match self.last_switch {
            None => {
                self.index = 0;
                self.last_switch = Some(now_millis);
            }
            Some(last) if now_millis >= last.saturating_add(interval_millis) => {
                self.index = (self.index + 1) % frames.len();
                self.last_switch = Some(now_millis);
            }
            Some(_) => {}
        }

        if self.index >= frames.len() {
            self.index = 0;
        }
        frames.get(self.index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
