//! Simulation observer trait for progress reporting and notifications.

use hm_agent::{DeathCause, JobKind};
use hm_building::BuildingTag;
use hm_core::{AgentId, BuildingId, Tick};

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop
/// and by its building and agent hooks.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: death notifications
///
/// ```rust,ignore
/// struct Obituaries(Vec<String>);
///
/// impl SimObserver for Obituaries {
///     fn on_agent_died(&mut self, agent: AgentId, cause: DeathCause) {
///         self.0.push(format!("{agent} {cause}"));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `stepped` is the number of agents
    /// whose routine ran this tick.
    fn on_tick_end(&mut self, _tick: Tick, _stepped: usize) {}

    /// Dusk (`night = true`) or dawn.
    fn on_day_phase(&mut self, _tick: Tick, _night: bool) {}

    fn on_agent_spawned(&mut self, _agent: AgentId, _job: JobKind) {}

    /// Notification text is `cause.message()`.
    fn on_agent_died(&mut self, _agent: AgentId, _cause: DeathCause) {}

    fn on_building_placed(&mut self, _building: BuildingId, _tag: BuildingTag) {}

    fn on_building_removed(&mut self, _building: BuildingId, _tag: BuildingTag) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
