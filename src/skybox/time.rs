//! Day-cycle clock in game ticks.

/// Number of ticks in one full day.
pub const DAY_LENGTH_TICKS: i32 = 24_000;

/// Time of day in ticks, in the range `[0, DAY_LENGTH_TICKS)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(i32);

impl TimeOfDay {
    /// Wrap an absolute world time (which keeps counting across days).
    pub fn from_world_time(ticks: i64) -> Self {
        Self(ticks.rem_euclid(DAY_LENGTH_TICKS as i64) as i32)
    }

    /// Current tick within the day.
    #[inline]
    pub fn ticks(self) -> i32 {
        self.0
    }
}

/// Ticks from `start` forward to `end`, wrapping past midnight.
///
/// `ticks_between(23_000, 1_000) == 2_000`.
pub fn ticks_between(start: i32, end: i32) -> i32 {
    if end >= start {
        end - start
    } else {
        end + DAY_LENGTH_TICKS - start
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
