//! The `Sim` struct, its tick loop, and the host-facing world hooks.

use log::{debug, info};
use rustc_hash::FxHashMap;

use hm_agent::{AgentRngs, AgentStore, DeathCause, JobKind};
use hm_building::{Building, BuildingError, BuildingRegistry};
use hm_core::{AgentId, BuildingId, CoreError, DayPhase, GridCoord, SimClock, SimConfig, Tick, WorldClock, WorldPos};
use hm_grid::{GridMap, PathFinder};
use hm_task::{Command, Effect, Presentation, TaskConfig, TaskContext, TaskScheduler};

use crate::{SimObserver, SimResult};

/// What a [`Sim::strike`] destroyed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrikeReport {
    pub killed:     Vec<AgentId>,
    pub demolished: Vec<BuildingId>,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick runs, in order:
///
/// 1. **Clock**: advance the day/night cycle; report dusk and dawn.
/// 2. **Construction**: advance build progress of supplied sites.
/// 3. **Agents**: step every living agent in ascending `AgentId` order.  The
///    effects an agent's step returns are applied before the next agent
///    runs, so a capture or a felled tree is visible to everyone after it.
/// 4. **Advance** the tick counter.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<F: PathFinder> {
    pub config:      SimConfig,
    pub task_config: TaskConfig,

    /// Tick counter and tick → seconds mapping.
    pub clock:       SimClock,
    pub world_clock: WorldClock,

    /// Occupancy grid.  Mutate only through [`place_building`](Self::place_building)
    /// and [`remove_building`](Self::remove_building) so paths are revalidated.
    pub grid:      GridMap,
    pub buildings: BuildingRegistry,

    pub agents:    AgentStore,
    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs:      AgentRngs,
    pub scheduler: TaskScheduler,
    pub finder:    F,

    /// Faith earned from completed sacrifices.
    pub faith: f32,
}

impl<F: PathFinder> Sim<F> {
    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.tick_once(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick_once(observer)?;
        }
        Ok(())
    }

    fn tick_once<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let stepped = self.process_tick(now, observer)?;
        observer.on_tick_end(now, stepped);
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        let dt = self.config.tick_duration_secs;

        // ── Phase 1: day/night ────────────────────────────────────────────
        if self.world_clock.tick(dt) {
            let night = self.world_clock.is_night();
            info!("{now}: {}", if night { "night falls" } else { "morning breaks" });
            observer.on_day_phase(now, night);
        }

        // ── Phase 2: construction ─────────────────────────────────────────
        self.buildings.advance_construction(dt);

        // ── Phase 3: agents in id order ───────────────────────────────────
        let night = self.world_clock.is_night();
        let elapsed = self.clock.elapsed_secs();
        let living: Vec<AgentId> = self.agents.living().collect();
        let mut stepped = 0;
        for agent in living {
            // An earlier agent's effects may have killed this one.
            if !self.agents.is_alive(agent) {
                continue;
            }
            let effects = {
                let mut ctx = TaskContext {
                    tick:      now,
                    dt,
                    now:       elapsed,
                    night,
                    grid:      &self.grid,
                    buildings: &mut self.buildings,
                    agents:    &mut self.agents,
                    finder:    &self.finder,
                    config:    &self.task_config,
                    rng:       self.rngs.get_mut(agent),
                    effects:   Vec::new(),
                };
                self.scheduler.step(agent, &mut ctx)
            };
            stepped += 1;
            for effect in effects {
                self.apply(effect, observer)?;
            }
        }
        Ok(stepped)
    }

    fn apply<O: SimObserver>(&mut self, effect: Effect, observer: &mut O) -> SimResult<()> {
        match effect {
            Effect::Demolish(id) => {
                if self.buildings.contains(id) {
                    self.remove_building(id, observer)?;
                }
            }
            Effect::Spawn { position, job, home } => {
                self.spawn_agent(position, job, home, observer)?;
            }
            Effect::Die { agent, cause } => {
                if self.agents.is_alive(agent) {
                    self.kill_agent(agent, cause, observer)?;
                }
            }
            Effect::Capture { victim, by, temple } => {
                debug!("{by} captures {victim} for {temple}");
                self.scheduler.deliver(Command::Capture { victim, by, temple }, &mut self.agents)?;
            }
            Effect::Sacrifice { victim, faith } => {
                if self.agents.is_alive(victim) {
                    self.faith += faith;
                    self.kill_agent(victim, DeathCause::Sacrificed, observer)?;
                }
            }
        }
        Ok(())
    }

    // ── Buildings ─────────────────────────────────────────────────────────

    /// Place a building, then abort every path it now blocks.
    ///
    /// A non-walkable building may not cover a cell an awake agent stands on.
    pub fn place_building<O: SimObserver>(&mut self, building: Building, observer: &mut O) -> SimResult<BuildingId> {
        if !building.walkable {
            let occupied: Vec<GridCoord> = self.occupancy().into_keys().collect();
            if !self.grid.can_place(building.footprint, &occupied) {
                return Err(BuildingError::NotPlaceable {
                    kind:   building.tag().as_str(),
                    origin: building.footprint.origin,
                }
                .into());
            }
        }
        let tag = building.tag();
        let id = self.buildings.register(&mut self.grid, building)?;
        let aborted = self.scheduler.revalidate(&self.grid);
        info!("placed {tag} {id} ({aborted} paths aborted)");
        observer.on_building_placed(id, tag);
        Ok(id)
    }

    /// Remove a building, wake anyone asleep inside, and revalidate paths.
    pub fn remove_building<O: SimObserver>(&mut self, id: BuildingId, observer: &mut O) -> SimResult<Building> {
        let building = self.buildings.unregister(&mut self.grid, id)?;
        if let Some(house) = building.house() {
            for &agent in house.inhabitants() {
                let i = agent.index();
                if self.agents.home[i] == Some(id) {
                    self.agents.home[i] = None;
                }
                self.agents.sleeping[i] = false;
            }
        }
        let tag = building.tag();
        let aborted = self.scheduler.revalidate(&self.grid);
        info!("removed {tag} {id} ({aborted} paths aborted)");
        observer.on_building_removed(id, tag);
        Ok(building)
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Add an agent with its own RNG and worker, optionally moving it into
    /// `home` if that house has room.
    pub fn spawn_agent<O: SimObserver>(
        &mut self,
        position: WorldPos,
        job:      JobKind,
        home:     Option<BuildingId>,
        observer: &mut O,
    ) -> SimResult<AgentId> {
        let agent = self.agents.push_agent(position, job);
        self.rngs.push();
        self.scheduler.add(agent, job)?;
        if let Some(h) = home {
            let moved_in = self
                .buildings
                .get_mut(h)
                .and_then(|b| b.house_mut())
                .is_some_and(|house| house.inhabit(agent));
            if moved_in {
                self.agents.home[agent.index()] = Some(h);
            }
        }
        info!("{agent} born as a {job} at {position}");
        observer.on_agent_spawned(agent, job);
        Ok(agent)
    }

    /// Kill a living agent.  Its worker is dropped and any altar it held is
    /// freed; routines tracking it see it as gone on their next liveness check.
    pub fn kill_agent<O: SimObserver>(&mut self, agent: AgentId, cause: DeathCause, observer: &mut O) -> SimResult<()> {
        if !self.agents.is_alive(agent) {
            return Err(CoreError::AgentNotFound(agent).into());
        }
        let i = agent.index();
        self.agents.alive[i] = false;
        self.agents.sleeping[i] = false;
        self.agents.captured[i] = false;
        self.agents.holding[i] = None;
        if let Some(h) = self.agents.home[i].take() {
            if let Some(house) = self.buildings.get_mut(h).and_then(|b| b.house_mut()) {
                house.evict(agent);
            }
        }
        if let Some(temple) = self.buildings.release_altar(agent) {
            debug!("{agent} died holding the altar of {temple}");
        }
        self.scheduler.forget(agent);
        info!("{agent} {cause}");
        observer.on_agent_died(agent, cause);
        Ok(())
    }

    /// Area strike: kill every awake agent and demolish every building with
    /// a cell centre strictly within `radius` of `center` (ground plane).
    pub fn strike<O: SimObserver>(&mut self, center: WorldPos, radius: f32, observer: &mut O) -> SimResult<StrikeReport> {
        let mut report = StrikeReport::default();

        let killed: Vec<AgentId> = self
            .agents
            .living()
            .filter(|&a| self.agents.is_active(a))
            .filter(|&a| self.agents.position[a.index()].ground_distance(center) < radius)
            .collect();
        for agent in killed {
            self.kill_agent(agent, DeathCause::Smitten, observer)?;
            report.killed.push(agent);
        }

        let scale = self.grid.scale;
        let grid_center = [(center.x - self.grid.origin.x) / scale, (center.z - self.grid.origin.z) / scale];
        let hit: Vec<BuildingId> = self
            .buildings
            .near(grid_center, radius / scale)
            .into_iter()
            .filter(|&id| {
                self.buildings.get(id).is_some_and(|b| {
                    b.footprint
                        .cells()
                        .any(|c| self.grid.center(c).ground_distance(center) < radius)
                })
            })
            .collect();
        for id in hit {
            self.remove_building(id, observer)?;
            report.demolished.push(id);
        }
        Ok(report)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Awake agents by the cell they stand on, in ascending id order per cell.
    pub fn occupancy(&self) -> FxHashMap<GridCoord, Vec<AgentId>> {
        let mut index: FxHashMap<GridCoord, Vec<AgentId>> = FxHashMap::default();
        for agent in self.agents.living().filter(|&a| self.agents.is_active(a)) {
            let cell = self.grid.grid_coord(self.agents.position[agent.index()]);
            index.entry(cell).or_default().push(agent);
        }
        index
    }

    /// The renderer's view of `agent`.  `None` once it has died.
    pub fn presentation(&self, agent: AgentId) -> Option<Presentation> {
        self.scheduler.presentation(agent)
    }

    pub fn is_night(&self) -> bool {
        self.world_clock.is_night()
    }
}
