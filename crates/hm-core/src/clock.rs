//! Day/night cycle.
//!
//! `WorldClock` tracks a normalized time of day in `[0.0, 1.0)` where 0.0 is
//! midnight and 0.5 is noon.  Night is the window from `night_start` to
//! `night_end`, wrapping through midnight.  The task scheduler only reads
//! [`DayPhase::is_night`]; it owns no time-of-day logic itself.

use crate::SimConfig;

/// The one question the scheduler asks of the clock.
pub trait DayPhase {
    fn is_night(&self) -> bool;
}

/// In-game time tracking for the day/night cycle.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldClock {
    /// Current time of day, normalized `[0.0, 1.0)`.
    pub time_of_day: f32,
    /// Duration of one full day in simulated seconds.
    pub day_length_secs: f32,
    pub night_start: f32,
    pub night_end: f32,
    /// Whether the cycle is frozen.
    pub paused: bool,
}

impl WorldClock {
    pub fn new(day_length_secs: f32, night_start: f32, night_end: f32, time_of_day: f32) -> Self {
        Self {
            time_of_day: time_of_day.rem_euclid(1.0),
            day_length_secs,
            night_start,
            night_end,
            paused: false,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.day_length_secs,
            config.night_start,
            config.night_end,
            config.start_time_of_day,
        )
    }

    /// A clock frozen at noon.  Night never falls.
    pub fn always_day() -> Self {
        let mut clock = Self::new(1.0, 0.8, 0.2, 0.5);
        clock.paused = true;
        clock
    }

    /// Advance the clock by `dt` simulated seconds.
    ///
    /// Returns `true` if the day phase flipped (dusk or dawn) during the step.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.paused {
            return false;
        }
        let was_night = self.is_night();
        self.time_of_day = (self.time_of_day + dt / self.day_length_secs).rem_euclid(1.0);
        was_night != self.is_night()
    }
}

impl DayPhase for WorldClock {
    fn is_night(&self) -> bool {
        let t = self.time_of_day;
        if self.night_start <= self.night_end {
            t >= self.night_start && t < self.night_end
        } else {
            t >= self.night_start || t < self.night_end
        }
    }
}
