//! Effects: world changes a worker step requests but cannot apply itself.

use hm_agent::{DeathCause, JobKind};
use hm_core::{AgentId, BuildingId, WorldPos};

/// A change to the world outside the stepping agent's own state.
///
/// Returned by [`TaskScheduler::step`][crate::TaskScheduler::step] and applied
/// by the simulation right after that agent's step, before the next agent
/// runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Remove a building (a felled tree).
    Demolish(BuildingId),

    /// Create a new agent.  The host instantiates it and moves it into `home`.
    Spawn {
        position: WorldPos,
        job:      JobKind,
        home:     Option<BuildingId>,
    },

    /// Kill an agent.
    Die {
        agent: AgentId,
        cause: DeathCause,
    },

    /// Seize another agent: replace its routine with a walk to `temple`.
    /// Delivered to the scheduler as a [`Command::Capture`][crate::Command].
    Capture {
        victim: AgentId,
        by:     AgentId,
        temple: BuildingId,
    },

    /// A completed sacrifice: the victim dies and `faith` is credited.
    Sacrifice {
        victim: AgentId,
        faith:  f32,
    },
}
