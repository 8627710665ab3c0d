//! Fluent builder for constructing a [`Sim`].

use log::warn;

use hm_agent::{AgentRngs, AgentStore};
use hm_building::{Building, BuildingRegistry};
use hm_core::{SimConfig, WorldClock};
use hm_grid::{GridMap, PathFinder};
use hm_task::{TaskConfig, TaskScheduler};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<F>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick length, total ticks, seed, day/night timing
/// - [`GridMap`]: the (initially open) occupancy grid
/// - [`AgentStore`] + [`AgentRngs`]: from [`hm_agent::AgentStoreBuilder`]
/// - `F: PathFinder`: the search algorithm (e.g. [`hm_grid::AStarFinder`])
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                               |
/// |---------------------|---------------------------------------|
/// | `.task_config(c)`   | `TaskConfig::default()`               |
/// | `.world_clock(c)`   | `WorldClock::from_config(&config)`    |
/// | `.building(b)`      | no buildings                          |
///
/// # Example
///
/// ```rust,ignore
/// let grid = GridMap::new(32, 32, WorldPos::ZERO, 1.0)?;
/// let (store, rngs) = AgentStoreBuilder::new(config.seed)
///     .agents(4, WorldPos::new(1.5, 0.0, 1.5), JobKind::Farmer)
///     .build();
/// let mut sim = SimBuilder::new(config, grid, store, rngs, AStarFinder::default())
///     .building(Building::of(BuildingTag::Warehouse, GridCoord::new(8, 8)))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<F: PathFinder> {
    config:      SimConfig,
    task_config: TaskConfig,
    world_clock: Option<WorldClock>,
    grid:        GridMap,
    buildings:   Vec<Building>,
    agents:      AgentStore,
    rngs:        AgentRngs,
    finder:      F,
}

impl<F: PathFinder> SimBuilder<F> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, grid: GridMap, agents: AgentStore, rngs: AgentRngs, finder: F) -> Self {
        Self {
            config,
            task_config: TaskConfig::default(),
            world_clock: None,
            grid,
            buildings: Vec::new(),
            agents,
            rngs,
            finder,
        }
    }

    pub fn task_config(mut self, task_config: TaskConfig) -> Self {
        self.task_config = task_config;
        self
    }

    /// Override the day/night clock (e.g. [`WorldClock::always_day`]).
    pub fn world_clock(mut self, clock: WorldClock) -> Self {
        self.world_clock = Some(clock);
        self
    }

    /// Queue a building for placement at build time, in call order.
    pub fn building(mut self, building: Building) -> Self {
        self.buildings.push(building);
        self
    }

    pub fn buildings(mut self, buildings: impl IntoIterator<Item = Building>) -> Self {
        self.buildings.extend(buildings);
        self
    }

    /// Validate inputs, place queued buildings, give every agent a worker,
    /// and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<F>> {
        self.config.validate()?;
        self.task_config.validate()?;

        let agent_count = self.agents.count;
        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent RNGs",
            });
        }
        if (self.finder.road_discount() - self.task_config.road_discount).abs() > f32::EPSILON {
            warn!(
                "path finder road discount {} differs from task config {}",
                self.finder.road_discount(),
                self.task_config.road_discount
            );
        }

        let mut grid = self.grid;
        let mut buildings = BuildingRegistry::new();
        for building in self.buildings {
            buildings.register(&mut grid, building)?;
        }

        let scheduler = TaskScheduler::for_agents(&self.agents);
        let world_clock = self.world_clock.unwrap_or_else(|| WorldClock::from_config(&self.config));

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            task_config: self.task_config,
            world_clock,
            grid,
            buildings,
            agents: self.agents,
            rngs: self.rngs,
            scheduler,
            finder: self.finder,
            faith: 0.0,
        })
    }
}
