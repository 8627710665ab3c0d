//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; one tick is one
//! simulation frame.  `SimClock` maps ticks to simulated seconds:
//!
//!   elapsed_secs = tick * tick_duration_secs
//!
//! Every agent routine resumes exactly once per tick, so `tick_duration_secs`
//! is also the `dt` used for movement and timed actions.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Frame counter.  Tick 0 is the first frame the loop runs.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated seconds one tick represents.
    pub tick_duration_secs: f32,
    /// The tick about to run.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_secs: f32) -> Self {
        Self { tick_duration_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick.0 += 1;
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.current_tick.0 as f32 * self.tick_duration_secs
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per tick (the frame `dt`).  Default: 0.1.
    pub tick_duration_secs: f32,

    /// Total ticks `Sim::run` simulates.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Length of a full day/night cycle in simulated seconds.
    pub day_length_secs: f32,

    /// Fraction of the day at which night begins, in `[0, 1)`.
    pub night_start: f32,

    /// Fraction of the day at which night ends (morning), in `[0, 1)`.
    pub night_end: f32,

    /// Time of day at tick 0, in `[0, 1)`.  0.0 is midnight, 0.5 noon.
    pub start_time_of_day: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs: 0.1,
            total_ticks:        6_000,
            seed:               42,
            day_length_secs:    240.0,
            night_start:        0.8,
            night_end:          0.2,
            start_time_of_day:  0.3,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }

    /// Reject configurations the tick loop cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_duration_secs.is_nan() || self.tick_duration_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "tick_duration_secs must be positive, got {}",
                self.tick_duration_secs
            )));
        }
        if self.day_length_secs.is_nan() || self.day_length_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "day_length_secs must be positive, got {}",
                self.day_length_secs
            )));
        }
        for (name, v) in [
            ("night_start", self.night_start),
            ("night_end", self.night_end),
            ("start_time_of_day", self.start_time_of_day),
        ] {
            if !(0.0..1.0).contains(&v) {
                return Err(CoreError::Config(format!("{name} must lie in [0, 1), got {v}")));
            }
        }
        Ok(())
    }
}
