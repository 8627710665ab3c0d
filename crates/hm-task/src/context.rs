//! World access handed to one agent's step.

use hm_agent::AgentStore;
use hm_building::{Building, BuildingRegistry, BuildingTag, Interactable, InteractionIndex};
use hm_core::{AgentId, AgentRng, BuildingId, GridCoord, Tick, WorldPos};
use hm_grid::{GridMap, PathFinder};

use crate::{Effect, TaskConfig};

/// Everything a worker step may read or write, borrowed for the duration of a
/// single agent's step.
///
/// The simulation builds one per agent per tick; the grid is read-only here
/// because occupancy only changes between steps (through effects).
pub struct TaskContext<'a> {
    pub tick:      Tick,
    /// Seconds per tick.
    pub dt:        f32,
    /// Elapsed simulated seconds.
    pub now:       f32,
    pub night:     bool,
    pub grid:      &'a GridMap,
    pub buildings: &'a mut BuildingRegistry,
    pub agents:    &'a mut AgentStore,
    pub finder:    &'a dyn PathFinder,
    pub config:    &'a TaskConfig,
    /// The stepping agent's RNG.
    pub rng:       &'a mut AgentRng,
    /// Effects emitted so far this step.
    pub effects:   Vec<Effect>,
}

impl TaskContext<'_> {
    #[inline]
    pub fn position(&self, agent: AgentId) -> WorldPos {
        self.agents.position[agent.index()]
    }

    #[inline]
    pub fn cell_of(&self, agent: AgentId) -> GridCoord {
        self.grid.grid_coord(self.position(agent))
    }

    /// Globally nearest reachable interaction cell of a `tag` building
    /// accepted by `predicate`, measured from `agent`'s cell.
    pub fn nearest<P>(&self, agent: AgentId, tag: BuildingTag, predicate: P) -> Option<Interactable>
    where
        P: Fn(&Building) -> bool,
    {
        InteractionIndex::new(self.grid, &*self.buildings, self.finder).nearest_of(self.cell_of(agent), tag, predicate)
    }

    /// Like [`nearest`](Self::nearest) without a kind filter.
    pub fn nearest_any<P>(&self, agent: AgentId, predicate: P) -> Option<Interactable>
    where
        P: Fn(&Building) -> bool,
    {
        InteractionIndex::new(self.grid, &*self.buildings, self.finder).nearest(self.cell_of(agent), predicate)
    }

    pub fn is_interaction_cell(&self, building: BuildingId, cell: GridCoord) -> bool {
        InteractionIndex::new(self.grid, &*self.buildings, self.finder).is_interaction_cell(building, cell)
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}
