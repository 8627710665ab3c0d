//! Unit tests for hm-task.

#[cfg(test)]
mod helpers {
    use hm_agent::{AgentRngs, AgentStore, AgentStoreBuilder, JobKind};
    use hm_building::{Building, BuildingRegistry};
    use hm_core::{AgentId, BuildingId, GridCoord, Tick, WorldPos};
    use hm_grid::{AStarFinder, GridMap};

    use crate::{Command, Effect, TaskConfig, TaskContext, TaskScheduler};

    /// A minimal host: steps every living agent in id order and applies
    /// effects right after each step.
    pub struct World {
        pub grid:      GridMap,
        pub buildings: BuildingRegistry,
        pub agents:    AgentStore,
        pub rngs:      AgentRngs,
        pub scheduler: TaskScheduler,
        pub finder:    AStarFinder,
        pub config:    TaskConfig,
        pub dt:        f32,
        pub tick:      u64,
        pub night:     bool,
        pub log:       Vec<(AgentId, Effect)>,
    }

    impl World {
        pub fn new(width: i32, height: i32) -> Self {
            let (agents, rngs) = AgentStoreBuilder::new(7).build();
            Self {
                grid: GridMap::new(width, height, WorldPos::ZERO, 1.0).unwrap(),
                buildings: BuildingRegistry::new(),
                agents,
                rngs,
                scheduler: TaskScheduler::new(),
                finder: AStarFinder::default(),
                config: TaskConfig::default(),
                dt: 0.1,
                tick: 0,
                night: false,
                log: Vec::new(),
            }
        }

        pub fn place(&mut self, building: Building) -> BuildingId {
            let id = self.buildings.register(&mut self.grid, building).unwrap();
            self.scheduler.revalidate(&self.grid);
            id
        }

        pub fn remove(&mut self, id: BuildingId) {
            self.buildings.unregister(&mut self.grid, id).unwrap();
            self.scheduler.revalidate(&self.grid);
        }

        pub fn spawn(&mut self, cell: GridCoord, job: JobKind) -> AgentId {
            let id = self.agents.push_agent(self.grid.center(cell), job);
            self.rngs.push();
            self.scheduler.add(id, job).unwrap();
            id
        }

        pub fn now(&self) -> f32 {
            self.tick as f32 * self.dt
        }

        pub fn step(&mut self) {
            let living: Vec<AgentId> = self.agents.living().collect();
            for agent in living {
                if !self.agents.is_alive(agent) {
                    continue;
                }
                let effects = {
                    let mut ctx = TaskContext {
                        tick:      Tick(self.tick),
                        dt:        self.dt,
                        now:       self.tick as f32 * self.dt,
                        night:     self.night,
                        grid:      &self.grid,
                        buildings: &mut self.buildings,
                        agents:    &mut self.agents,
                        finder:    &self.finder,
                        config:    &self.config,
                        rng:       self.rngs.get_mut(agent),
                        effects:   Vec::new(),
                    };
                    self.scheduler.step(agent, &mut ctx)
                };
                for effect in effects {
                    self.apply(agent, effect);
                }
            }
            self.tick += 1;
        }

        pub fn kill(&mut self, agent: AgentId) {
            self.agents.alive[agent.index()] = false;
            self.scheduler.forget(agent);
        }

        fn apply(&mut self, by: AgentId, effect: Effect) {
            match &effect {
                Effect::Demolish(id) => self.remove(*id),
                Effect::Die { agent, .. } => self.kill(*agent),
                Effect::Sacrifice { victim, .. } => self.kill(*victim),
                Effect::Capture { victim, by, temple } => {
                    let command = Command::Capture { victim: *victim, by: *by, temple: *temple };
                    self.scheduler.deliver(command, &mut self.agents).unwrap();
                }
                Effect::Spawn { .. } => {}
            }
            self.log.push((by, effect));
        }

        pub fn run(&mut self, ticks: u64) {
            for _ in 0..ticks {
                self.step();
            }
        }

        /// Step until `done` holds; `true` if it did within `max_ticks`.
        pub fn run_until(&mut self, max_ticks: u64, mut done: impl FnMut(&World) -> bool) -> bool {
            for _ in 0..max_ticks {
                if done(self) {
                    return true;
                }
                self.step();
            }
            done(self)
        }
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::{TaskConfig, TaskError};

    #[test]
    fn default_is_valid() {
        assert!(TaskConfig::default().validate().is_ok());
    }

    #[test]
    fn road_discount_below_one_rejected() {
        let cfg = TaskConfig { road_discount: 0.5, ..TaskConfig::default() };
        assert!(matches!(cfg.validate(), Err(TaskError::Config(_))));
    }

    #[test]
    fn zero_sync_steps_rejected() {
        let cfg = TaskConfig { max_sync_steps: 0, ..TaskConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_duration_rejected() {
        let cfg = TaskConfig { eat_secs: -1.0, ..TaskConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use hm_core::{GridCoord, WorldPos};
    use hm_grid::GridMap;

    use crate::{Body, MoveStatus, Motion};

    fn grid() -> GridMap {
        GridMap::new(5, 5, WorldPos::ZERO, 1.0).unwrap()
    }

    #[test]
    fn carries_leftover_across_waypoints() {
        let grid = grid();
        let mut m = Motion::default();
        m.start(GridCoord::new(2, 0), vec![GridCoord::new(1, 0), GridCoord::new(2, 0)]);
        let mut pos = grid.center(GridCoord::new(0, 0));

        assert_eq!(m.advance(&mut pos, &grid, 1.5), MoveStatus::Moving);
        assert!((pos.x - 2.0).abs() < 1e-5);
        assert_eq!(m.remaining(), &[GridCoord::new(2, 0)]);

        assert_eq!(m.advance(&mut pos, &grid, 1.0), MoveStatus::Arrived);
        assert_eq!(pos, grid.center(GridCoord::new(2, 0)));
        assert!(!m.is_travelling());
    }

    #[test]
    fn empty_path_arrives_immediately() {
        let grid = grid();
        let mut m = Motion::default();
        m.start(GridCoord::new(0, 0), Vec::new());
        let mut pos = grid.center(GridCoord::new(0, 0));
        assert_eq!(m.advance(&mut pos, &grid, 0.1), MoveStatus::Arrived);
    }

    #[test]
    fn abort_sticks_until_restart() {
        let grid = grid();
        let mut m = Motion::default();
        m.start(GridCoord::new(1, 0), vec![GridCoord::new(1, 0)]);
        m.abort();
        let mut pos = grid.center(GridCoord::new(0, 0));
        assert_eq!(m.advance(&mut pos, &grid, 5.0), MoveStatus::Aborted);
        assert_eq!(pos, grid.center(GridCoord::new(0, 0)));

        m.start(GridCoord::new(1, 0), vec![GridCoord::new(1, 0)]);
        assert_eq!(m.advance(&mut pos, &grid, 5.0), MoveStatus::Arrived);
    }

    #[test]
    fn blocked_when_a_waypoint_closes() {
        let mut grid = grid();
        let mut m = Motion::default();
        m.start(GridCoord::new(3, 0), (1..=3).map(|x| GridCoord::new(x, 0)).collect());
        assert!(!m.is_blocked(&grid));
        grid.set_occupancy(GridCoord::new(2, 0), false, false, false).unwrap();
        assert!(m.is_blocked(&grid));
    }

    #[test]
    fn road_speeds_travel_by_the_road_discount() {
        use hm_agent::JobKind;
        use hm_building::{Building, BuildingTag};
        use hm_core::{AgentId, Tick};

        use crate::TaskContext;
        use super::helpers::World;

        let mut w = World::new(10, 3);
        w.place(Building::of(BuildingTag::Road, GridCoord::new(0, 1)).with_size(10, 1));
        let on_road = w.spawn(GridCoord::new(0, 1), JobKind::Farmer);
        let off_road = w.spawn(GridCoord::new(0, 2), JobKind::Farmer);

        let moved = |w: &mut World, agent: AgentId, y: i32| {
            let start = w.agents.position[agent.index()];
            let mut body = Body::default();
            body.motion.start(GridCoord::new(9, y), (1..=9).map(|x| GridCoord::new(x, y)).collect());
            let mut ctx = TaskContext {
                tick:      Tick(0),
                dt:        w.dt,
                now:       0.0,
                night:     false,
                grid:      &w.grid,
                buildings: &mut w.buildings,
                agents:    &mut w.agents,
                finder:    &w.finder,
                config:    &w.config,
                rng:       w.rngs.get_mut(agent),
                effects:   Vec::new(),
            };
            assert_eq!(body.travel(agent, &mut ctx), MoveStatus::Moving);
            w.agents.position[agent.index()].x - start.x
        };

        let base = w.config.velocity * w.dt;
        let fast = moved(&mut w, on_road, 1);
        let slow = moved(&mut w, off_road, 2);
        assert!((fast - base * w.config.road_discount).abs() < 1e-4, "moved {fast}");
        assert!((slow - base).abs() < 1e-4, "moved {slow}");
    }

    #[test]
    fn act_yields_for_its_duration() {
        let mut body = Body::default();
        let mut yields = 0;
        while body.act(0.1, 0.5, 1.0, WorldPos::ZERO) {
            yields += 1;
            assert!(body.acting.is_some());
        }
        assert_eq!(yields, 5);
        assert!(body.acting.is_none());
    }

    #[test]
    fn zero_length_act_completes_at_once() {
        let mut body = Body::default();
        assert!(!body.act(0.1, 0.0, 1.0, WorldPos::ZERO));
    }

    #[test]
    fn presentation_tracks_heading_and_speed() {
        let mut body = Body::default();
        let before = WorldPos::new(0.0, 0.0, 0.0);
        let after = WorldPos::new(0.0, 0.0, 0.2);
        body.present(before, after, 0.1, None, false);
        let p = body.presentation;
        assert!((p.velocity.1 - 2.0).abs() < 1e-4);
        assert_eq!(p.facing, (0.0, 1.0));
        assert!(p.visible);

        // Standing still keeps the last heading.
        body.present(after, after, 0.1, None, true);
        assert_eq!(body.presentation.facing, (0.0, 1.0));
        assert_eq!(body.presentation.velocity, (0.0, 0.0));
        assert!(!body.presentation.visible);
    }
}

// ── Plans ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod plans {
    use hm_agent::JobKind;
    use hm_building::{Building, BuildingKind, BuildingTag, Field};
    use hm_core::{GridCoord, ResourceKind};

    use crate::{Action, Goal, TaskConfig, plan_for};

    #[test]
    fn every_non_priest_job_has_a_cycle() {
        for job in JobKind::NEWBORN {
            assert_eq!(plan_for(job).len(), 2, "{job}");
        }
        assert!(plan_for(JobKind::Priest).is_empty());
    }

    #[test]
    fn farmer_carries_food_to_storage() {
        let plan = plan_for(JobKind::Farmer);
        assert_eq!(plan[0].goal, Goal::ReadyField);
        assert_eq!(plan[1].action, Action::Deposit(ResourceKind::Food));
        assert_eq!(plan[1].goal.tag(), Some(BuildingTag::Warehouse));
    }

    #[test]
    fn unripe_or_unbuilt_field_rejected() {
        let unripe = Building::new(BuildingKind::Field(Field::new(0.0, 15.0)), GridCoord::new(0, 0));
        assert!(!Goal::ReadyField.accepts(&unripe, 10.0));
        assert!(Goal::ReadyField.accepts(&unripe, 15.0));

        let unbuilt = Building::new(BuildingKind::Field(Field::new(0.0, 0.0)), GridCoord::new(0, 0))
            .under_construction(3);
        assert!(!Goal::ReadyField.accepts(&unbuilt, 100.0));
        assert!(Goal::SiteNeedingWood.accepts(&unbuilt, 100.0));
    }

    #[test]
    fn transfers_share_one_duration() {
        let cfg = TaskConfig::default();
        assert_eq!(Action::Deliver.duration(&cfg), cfg.transfer_secs);
        assert_eq!(Action::Fell.duration(&cfg), cfg.fell_secs);
        assert_eq!(Action::Feed.requires(), Some(ResourceKind::Food));
        assert_eq!(Action::Harvest.requires(), None);
    }
}

// ── Job routines ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod jobs {
    use hm_agent::JobKind;
    use hm_building::{Building, BuildingKind, BuildingTag, Field, House};
    use hm_core::{GridCoord, ResourceKind};

    use super::helpers::World;
    use crate::{Activity, Effect};

    fn ready_field(origin: GridCoord) -> Building {
        Building::new(BuildingKind::Field(Field::new(0.0, 0.0)), origin)
    }

    fn stored(world: &World, id: hm_core::BuildingId, kind: ResourceKind) -> u32 {
        world
            .buildings
            .get(id)
            .and_then(|b| b.warehouse())
            .filter(|w| w.kind() == Some(kind))
            .map_or(0, |w| w.count())
    }

    #[test]
    fn farmer_harvests_and_deposits_repeatedly() {
        let mut w = World::new(10, 10);
        w.place(ready_field(GridCoord::new(4, 4)));
        let store = w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(7, 1)));
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);

        assert!(w.run_until(400, |w| stored(w, store, ResourceKind::Food) >= 1));
        assert!(w.run_until(400, |w| stored(w, store, ResourceKind::Food) >= 2));
        assert!(w.agents.is_alive(farmer));
    }

    #[test]
    fn carried_food_is_presented() {
        let mut w = World::new(10, 10);
        w.place(ready_field(GridCoord::new(4, 4)));
        w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(7, 1)));
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);

        assert!(w.run_until(400, |w| w.agents.holding[farmer.index()] == Some(ResourceKind::Food)));
        w.step();
        let p = w.scheduler.presentation(farmer).unwrap();
        assert_eq!(p.holding, Some(ResourceKind::Food));
    }

    #[test]
    fn unreachable_field_leaves_farmer_waiting() {
        let mut w = World::new(10, 10);
        w.place(ready_field(GridCoord::new(4, 4)));
        // Ring of walls around the 2×2 field.
        for x in 3..=6 {
            w.place(Building::of(BuildingTag::Wall, GridCoord::new(x, 3)));
            w.place(Building::of(BuildingTag::Wall, GridCoord::new(x, 6)));
        }
        for y in 4..=5 {
            w.place(Building::of(BuildingTag::Wall, GridCoord::new(3, y)));
            w.place(Building::of(BuildingTag::Wall, GridCoord::new(6, y)));
        }
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);
        let start = w.agents.position[farmer.index()];

        w.run(50);
        assert!(w.agents.is_alive(farmer));
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::Wait));
        assert_eq!(w.agents.position[farmer.index()], start);
        assert!(w.log.is_empty());
    }

    #[test]
    fn logger_fells_tree_and_stores_wood() {
        let mut w = World::new(10, 10);
        let tree = w.place(Building::of(BuildingTag::Tree, GridCoord::new(5, 5)));
        let store = w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(1, 7)));
        let logger = w.spawn(GridCoord::new(0, 0), JobKind::Logger);

        assert!(w.run_until(600, |w| stored(w, store, ResourceKind::Wood) == 1));
        assert!(!w.buildings.contains(tree));
        assert!(w.grid.is_walkable(GridCoord::new(5, 5)));
        assert!(w.log.contains(&(logger, Effect::Demolish(tree))));
    }

    #[test]
    fn logger_already_carrying_wood_stores_it_first() {
        let mut w = World::new(10, 10);
        let tree = w.place(Building::of(BuildingTag::Tree, GridCoord::new(8, 8)));
        let store = w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(1, 3)));
        let logger = w.spawn(GridCoord::new(0, 0), JobKind::Logger);
        w.agents.holding[logger.index()] = Some(ResourceKind::Wood);

        assert!(w.run_until(300, |w| stored(w, store, ResourceKind::Wood) == 1));
        assert!(w.buildings.contains(tree));
        assert_eq!(w.agents.holding[logger.index()], None);
    }

    #[test]
    fn builder_supplies_construction_site() {
        let mut w = World::new(12, 12);
        let store = w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(1, 8)));
        for _ in 0..2 {
            let wh = w.buildings.get_mut(store).and_then(|b| b.warehouse_mut()).unwrap();
            assert!(wh.add(ResourceKind::Wood));
        }
        let site = w.place(Building::of(BuildingTag::House, GridCoord::new(7, 7)).under_construction(2));
        w.spawn(GridCoord::new(0, 0), JobKind::Builder);

        assert!(w.run_until(1000, |w| w.buildings.get(site).unwrap().construction.wood_provided == 2));
        assert_eq!(stored(&w, store, ResourceKind::Wood), 0);
    }

    #[test]
    fn breeder_feeding_produces_newborn() {
        let mut w = World::new(12, 12);
        let store = w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(1, 6)));
        {
            let wh = w.buildings.get_mut(store).and_then(|b| b.warehouse_mut()).unwrap();
            assert!(wh.add(ResourceKind::Food));
        }
        let house = w.place(Building::new(BuildingKind::House(House::new(4, 1)), GridCoord::new(7, 7)));
        let breeder = w.spawn(GridCoord::new(0, 0), JobKind::Breeder);

        let born = |w: &World| {
            w.log
                .iter()
                .any(|(by, e)| *by == breeder && matches!(e, Effect::Spawn { home, .. } if *home == Some(house)))
        };
        assert!(w.run_until(800, born));
        let Some((_, Effect::Spawn { job, .. })) = w.log.iter().find(|(_, e)| matches!(e, Effect::Spawn { .. }))
        else {
            unreachable!()
        };
        assert_ne!(*job, JobKind::Priest);
    }

    #[test]
    fn wall_across_path_forces_detour() {
        let mut w = World::new(10, 10);
        w.place(ready_field(GridCoord::new(8, 4)));
        w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(8, 0)));
        let farmer = w.spawn(GridCoord::new(0, 5), JobKind::Farmer);
        w.run(3);
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::Travel));

        // Wall at x = 4 leaving only the top row open.
        let wall = Building::of(BuildingTag::Wall, GridCoord::new(4, 0)).with_size(1, 9);
        let id = w.buildings.register(&mut w.grid, wall).unwrap();
        assert_eq!(w.scheduler.revalidate(&w.grid), 1);
        assert!(w.scheduler.worker(farmer).unwrap().body.motion.aborted);

        let mut crossed_wall = false;
        let reached = w.run_until(600, |w| {
            let cell = w.grid.grid_coord(w.agents.position[farmer.index()]);
            crossed_wall |= w.buildings.at(cell) == Some(id);
            w.agents.holding[farmer.index()] == Some(ResourceKind::Food)
        });
        assert!(reached);
        assert!(!crossed_wall);
    }
}

// ── Rest ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rest {
    use hm_agent::{DeathCause, JobKind};
    use hm_building::{Building, BuildingKind, BuildingTag, House};
    use hm_core::{GridCoord, ResourceKind};

    use super::helpers::World;
    use crate::{Activity, Effect};

    #[test]
    fn sleeps_at_night_and_wakes_hungry() {
        let mut w = World::new(10, 10);
        let house = w.place(Building::of(BuildingTag::House, GridCoord::new(5, 5)));
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);
        w.night = true;

        assert!(w.run_until(300, |w| w.agents.sleeping[farmer.index()]));
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::Asleep));
        assert_eq!(w.agents.home[farmer.index()], Some(house));
        w.step();
        assert!(!w.scheduler.presentation(farmer).unwrap().visible);

        w.night = false;
        w.step();
        assert!(!w.agents.sleeping[farmer.index()]);
        assert!(w.agents.status[farmer.index()].hungry);
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::FindFood));
    }

    #[test]
    fn pantry_breakfast_returns_to_work() {
        let mut w = World::new(10, 10);
        let house = w.place(Building::new(BuildingKind::House(House::new(4, 10)), GridCoord::new(5, 5)));
        w.buildings.get_mut(house).and_then(|b| b.house_mut()).unwrap().feed();
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);
        w.night = true;
        assert!(w.run_until(300, |w| w.agents.sleeping[farmer.index()]));

        w.night = false;
        w.step();
        assert!(!w.agents.status[farmer.index()].hungry);
        assert_eq!(w.buildings.get(house).and_then(|b| b.house()).unwrap().food(), 0);
        // No field anywhere: back in the job routine, waiting.
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::Wait));
    }

    #[test]
    fn hungry_worker_eats_from_storage() {
        let mut w = World::new(10, 10);
        w.place(Building::of(BuildingTag::House, GridCoord::new(5, 5)));
        let store = w.place(Building::of(BuildingTag::Warehouse, GridCoord::new(1, 7)));
        w.buildings.get_mut(store).and_then(|b| b.warehouse_mut()).unwrap().add(ResourceKind::Food);
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);
        w.night = true;
        assert!(w.run_until(300, |w| w.agents.sleeping[farmer.index()]));
        w.night = false;

        assert!(w.run_until(10, |w| w.agents.status[farmer.index()].hungry));
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::FindFood));
        assert!(w.run_until(300, |w| !w.agents.status[farmer.index()].hungry));
        assert!(w.agents.is_alive(farmer));
        assert!(w.buildings.get(store).and_then(|b| b.warehouse()).unwrap().is_empty());
    }

    #[test]
    fn no_food_means_starvation() {
        let mut w = World::new(10, 10);
        w.config.starvation_secs = 2.0;
        w.place(Building::of(BuildingTag::House, GridCoord::new(5, 5)));
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);
        w.night = true;
        assert!(w.run_until(300, |w| w.agents.sleeping[farmer.index()]));
        w.night = false;

        assert!(w.run_until(40, |w| !w.agents.is_alive(farmer)));
        assert!(w.log.contains(&(farmer, Effect::Die { agent: farmer, cause: DeathCause::Starved })));
        assert!(w.scheduler.worker(farmer).is_none());
    }

    #[test]
    fn homeless_worker_waits_through_the_night() {
        let mut w = World::new(6, 6);
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);
        w.night = true;
        w.run(30);
        assert!(w.agents.is_alive(farmer));
        assert!(!w.agents.sleeping[farmer.index()]);
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::FindHouse));
    }

    #[test]
    fn demolished_house_wakes_sleeper() {
        let mut w = World::new(10, 10);
        let house = w.place(Building::of(BuildingTag::House, GridCoord::new(5, 5)));
        let farmer = w.spawn(GridCoord::new(0, 0), JobKind::Farmer);
        w.night = true;
        assert!(w.run_until(300, |w| w.agents.sleeping[farmer.index()]));

        w.remove(house);
        w.step();
        assert!(!w.agents.sleeping[farmer.index()]);
        assert_eq!(w.agents.home[farmer.index()], None);
        assert_eq!(w.scheduler.activity(farmer), Some(Activity::FindHouse));
    }
}

// ── Priest ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod priest {
    use hm_agent::JobKind;
    use hm_building::{Building, BuildingTag};
    use hm_core::GridCoord;

    use super::helpers::World;
    use crate::{Activity, Effect};

    fn captured(w: &World) -> bool {
        w.log.iter().any(|(_, e)| matches!(e, Effect::Capture { .. }))
    }

    #[test]
    fn catches_escorts_and_sacrifices() {
        let mut w = World::new(12, 12);
        let temple = w.place(Building::of(BuildingTag::Temple, GridCoord::new(6, 6)));
        let priest = w.spawn(GridCoord::new(0, 0), JobKind::Priest);
        let victim = w.spawn(GridCoord::new(1, 0), JobKind::Farmer);

        assert!(w.run_until(100, captured));
        assert!(w.agents.captured[victim.index()]);
        assert_eq!(w.scheduler.activity(victim), Some(Activity::Captive));
        assert_eq!(w.scheduler.worker(victim).unwrap().captor_temple(), Some(temple));

        assert!(w.run_until(800, |w| !w.agents.is_alive(victim)));
        let faith: f32 = w
            .log
            .iter()
            .filter_map(|(by, e)| match e {
                Effect::Sacrifice { victim: v, faith } if *by == priest && *v == victim => Some(*faith),
                _ => None,
            })
            .sum();
        assert_eq!(faith, 10.0);
        assert!(w.buildings.get(temple).unwrap().can_sacrifice());
    }

    #[test]
    fn captive_released_when_temple_falls() {
        let mut w = World::new(12, 12);
        let temple = w.place(Building::of(BuildingTag::Temple, GridCoord::new(6, 6)));
        let priest = w.spawn(GridCoord::new(0, 0), JobKind::Priest);
        let victim = w.spawn(GridCoord::new(1, 0), JobKind::Farmer);
        assert!(w.run_until(100, captured));

        w.remove(temple);
        w.step();
        assert!(!w.agents.captured[victim.index()]);
        assert!(!w.scheduler.worker(victim).unwrap().is_captive());
        assert!(w.agents.is_alive(victim));
        assert_eq!(w.scheduler.activity(priest), Some(Activity::FindTemple));
    }

    #[test]
    fn captive_released_when_captor_dies() {
        let mut w = World::new(12, 12);
        w.place(Building::of(BuildingTag::Temple, GridCoord::new(6, 6)));
        let priest = w.spawn(GridCoord::new(0, 0), JobKind::Priest);
        let victim = w.spawn(GridCoord::new(1, 0), JobKind::Farmer);
        assert!(w.run_until(100, captured));
        assert_eq!(w.scheduler.worker(victim).unwrap().captor(), Some(priest));

        w.kill(priest);
        w.step();
        assert!(!w.agents.captured[victim.index()]);
        assert!(!w.scheduler.worker(victim).unwrap().is_captive());
        assert_ne!(w.scheduler.activity(victim), Some(Activity::Captive));
        assert!(w.agents.is_alive(victim));
    }

    #[test]
    fn no_candidates_means_no_chase() {
        let mut w = World::new(8, 8);
        w.place(Building::of(BuildingTag::Temple, GridCoord::new(4, 4)));
        let priest = w.spawn(GridCoord::new(0, 0), JobKind::Priest);
        w.spawn(GridCoord::new(1, 1), JobKind::Priest);
        w.run(20);
        assert!(!captured(&w));
        assert_eq!(w.scheduler.activity(priest), Some(Activity::FindTemple));
    }

    #[test]
    fn sleeping_agents_are_not_chased() {
        let mut w = World::new(8, 8);
        w.place(Building::of(BuildingTag::Temple, GridCoord::new(4, 4)));
        let priest = w.spawn(GridCoord::new(0, 0), JobKind::Priest);
        let sleeper = w.spawn(GridCoord::new(1, 1), JobKind::Farmer);
        w.agents.sleeping[sleeper.index()] = true;
        w.run(5);
        assert!(!captured(&w));
        assert_ne!(w.scheduler.activity(priest), Some(Activity::Chase));
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use hm_agent::{AgentStoreBuilder, JobKind};
    use hm_core::{AgentId, BuildingId, WorldPos};

    use crate::{Activity, Command, TaskError, TaskScheduler};

    #[test]
    fn one_worker_per_agent() {
        let mut s = TaskScheduler::new();
        s.add(AgentId(3), JobKind::Logger).unwrap();
        assert!(matches!(s.add(AgentId(3), JobKind::Farmer), Err(TaskError::DuplicateWorker(_))));
        assert_eq!(s.len(), 1);
        assert!(s.worker(AgentId(0)).is_none());
        assert_eq!(s.activity(AgentId(3)), Some(Activity::Seek));
    }

    #[test]
    fn for_agents_covers_living() {
        let (store, _) = AgentStoreBuilder::new(1)
            .agents(3, WorldPos::ZERO, JobKind::Farmer)
            .agent(WorldPos::ZERO, JobKind::Priest)
            .build();
        let s = TaskScheduler::for_agents(&store);
        assert_eq!(s.len(), 4);
        assert_eq!(s.activity(AgentId(3)), Some(Activity::FindTemple));
    }

    #[test]
    fn forget_then_capture_errors() {
        let (mut store, _) = AgentStoreBuilder::new(1).agent(WorldPos::ZERO, JobKind::Farmer).build();
        let mut s = TaskScheduler::for_agents(&store);
        assert!(s.forget(AgentId(0)).is_some());
        let command = Command::Capture { victim: AgentId(0), by: AgentId(1), temple: BuildingId(0) };
        assert!(matches!(s.deliver(command, &mut store), Err(TaskError::NoWorker(_))));
        assert!(!store.captured[0]);
    }
}
