//! Tunables for worker movement and routines.

use crate::{TaskError, TaskResult};

/// Worker tuning.  All durations are simulated seconds; speeds are world
/// units per second.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskConfig {
    // ── Movement ──────────────────────────────────────────────────────────
    pub velocity:            f32,
    /// Road factor.  Path search divides the cost of a step departing a
    /// road cell by it, and travel speed on a road cell is multiplied by it.
    pub road_discount:       f32,
    /// Speed multiplier while hungry.
    pub hungry_speed_factor: f32,

    // ── Act durations ─────────────────────────────────────────────────────
    pub harvest_secs:   f32,
    pub fell_secs:      f32,
    /// Deposit, withdraw, deliver and feed.
    pub transfer_secs:  f32,
    pub eat_secs:       f32,
    pub sacrifice_secs: f32,

    // ── Retries and deadlines ─────────────────────────────────────────────
    /// Delay before re-running a search that found nothing.
    pub retry_secs:      f32,
    /// Time from waking without breakfast to death by starvation.
    pub starvation_secs: f32,

    // ── Priest ────────────────────────────────────────────────────────────
    /// Ticks between path recomputations while chasing.
    pub priest_repath_ticks: u32,
    /// Failed path searches tolerated before the priest picks another victim.
    pub priest_retry_budget: u32,
    /// Ground distance at which a chased agent is caught.
    pub contact_radius:      f32,
    pub escort_timeout_secs: f32,

    // ── Scheduler ─────────────────────────────────────────────────────────
    /// Synchronous steps allowed per agent per tick before it is forced to yield.
    pub max_sync_steps: u32,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            velocity:            2.0,
            road_discount:       2.0,
            hungry_speed_factor: 0.5,
            harvest_secs:        1.0,
            fell_secs:           2.0,
            transfer_secs:       0.5,
            eat_secs:            1.0,
            sacrifice_secs:      3.0,
            retry_secs:          1.0,
            starvation_secs:     60.0,
            priest_repath_ticks: 10,
            priest_retry_budget: 5,
            contact_radius:      0.75,
            escort_timeout_secs: 30.0,
            max_sync_steps:      16,
        }
    }
}

impl TaskConfig {
    pub fn validate(&self) -> TaskResult<()> {
        let positive = [
            ("velocity", self.velocity),
            ("hungry_speed_factor", self.hungry_speed_factor),
            ("contact_radius", self.contact_radius),
        ];
        for (name, v) in positive {
            if v.is_nan() || v <= 0.0 {
                return Err(TaskError::Config(format!("{name} must be positive, got {v}")));
            }
        }
        if self.road_discount.is_nan() || self.road_discount < 1.0 {
            return Err(TaskError::Config(format!(
                "road_discount must be at least 1, got {}",
                self.road_discount
            )));
        }
        let non_negative = [
            ("harvest_secs", self.harvest_secs),
            ("fell_secs", self.fell_secs),
            ("transfer_secs", self.transfer_secs),
            ("eat_secs", self.eat_secs),
            ("sacrifice_secs", self.sacrifice_secs),
            ("retry_secs", self.retry_secs),
            ("starvation_secs", self.starvation_secs),
            ("escort_timeout_secs", self.escort_timeout_secs),
        ];
        for (name, v) in non_negative {
            if v.is_nan() || v < 0.0 {
                return Err(TaskError::Config(format!("{name} must not be negative, got {v}")));
            }
        }
        if self.max_sync_steps == 0 {
            return Err(TaskError::Config("max_sync_steps must be at least 1".into()));
        }
        Ok(())
    }
}
