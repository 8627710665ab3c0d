//! village: a small hamlet run for two in-game days.
//!
//! Farmers, loggers, builders, a breeder and a priest share a 40 × 30 grid
//! with fields, warehouses, houses, a temple, a stand of trees, a road and
//! one house under construction.  Halfway through, a strike lands on the
//! woods.  Set `RUST_LOG=info` (or `debug`) to follow individual agents.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use log::info;

use hm_agent::{AgentStoreBuilder, DeathCause, JobKind};
use hm_building::{Building, BuildingKind, BuildingTag, Field, House};
use hm_core::{AgentId, BuildingId, GridCoord, SimConfig, Tick, WorldPos};
use hm_grid::{AStarFinder, GridMap};
use hm_sim::{SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const WIDTH:           i32   = 40;
const HEIGHT:          i32   = 30;
const SEED:            u64   = 7;
const DAY_LENGTH_SECS: f32   = 240.0;
const SIM_DAYS:        u64   = 2;
const TICK_SECS:       f32   = 0.1;

const CREW: [(JobKind, usize); 5] = [
    (JobKind::Farmer, 4),
    (JobKind::Logger, 2),
    (JobKind::Builder, 2),
    (JobKind::Breeder, 1),
    (JobKind::Priest, 1),
];

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SummaryObserver {
    births:     usize,
    deaths:     BTreeMap<&'static str, usize>,
    dawns:      usize,
    dusks:      usize,
    demolished: usize,
}

impl SimObserver for SummaryObserver {
    fn on_day_phase(&mut self, tick: Tick, night: bool) {
        if night {
            self.dusks += 1;
        } else {
            self.dawns += 1;
            println!("{tick}: day {}", self.dawns + 1);
        }
    }

    fn on_agent_spawned(&mut self, _agent: AgentId, _job: JobKind) {
        self.births += 1;
    }

    fn on_agent_died(&mut self, agent: AgentId, cause: DeathCause) {
        println!("  {agent} {cause}");
        *self.deaths.entry(cause.message()).or_default() += 1;
    }

    fn on_building_removed(&mut self, _building: BuildingId, _tag: BuildingTag) {
        self.demolished += 1;
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

fn layout() -> Vec<Building> {
    let mut b = vec![
        // Main street along y = 14.
        Building::of(BuildingTag::Road, GridCoord::new(2, 14)).with_size(36, 1),
        Building::new(BuildingKind::Field(Field::new(0.0, 20.0)), GridCoord::new(3, 3)),
        Building::new(BuildingKind::Field(Field::new(0.0, 20.0)), GridCoord::new(3, 7)),
        Building::new(BuildingKind::Field(Field::new(0.0, 20.0)), GridCoord::new(7, 3)),
        Building::of(BuildingTag::Warehouse, GridCoord::new(11, 10)),
        Building::of(BuildingTag::Warehouse, GridCoord::new(15, 10)),
        Building::of(BuildingTag::Warehouse, GridCoord::new(19, 10)),
        Building::new(BuildingKind::House(House::new(4, 2)), GridCoord::new(10, 17)),
        Building::new(BuildingKind::House(House::new(4, 2)), GridCoord::new(14, 17)),
        Building::new(BuildingKind::House(House::new(4, 2)), GridCoord::new(18, 17)),
        Building::of(BuildingTag::House, GridCoord::new(24, 17)).under_construction(3),
        Building::of(BuildingTag::Temple, GridCoord::new(30, 20)),
    ];
    for (x, y) in [(31, 4), (33, 6), (35, 3), (34, 9), (30, 8), (36, 7), (32, 10)] {
        b.push(Building::of(BuildingTag::Tree, GridCoord::new(x, y)));
    }
    b
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== village: hamlet settlement ===");
    println!("Grid: {WIDTH} × {HEIGHT}  |  Days: {SIM_DAYS}  |  Seed: {SEED}");
    println!();

    // 1. Config.
    let config = SimConfig {
        tick_duration_secs: TICK_SECS,
        total_ticks:        (SIM_DAYS as f32 * DAY_LENGTH_SECS / TICK_SECS) as u64,
        seed:               SEED,
        day_length_secs:    DAY_LENGTH_SECS,
        ..SimConfig::default()
    };

    // 2. Grid and crew.
    let grid = GridMap::new(WIDTH, HEIGHT, WorldPos::ZERO, 1.0)?;
    let mut agents = AgentStoreBuilder::new(config.seed);
    let mut x = 4;
    for (job, n) in CREW {
        for _ in 0..n {
            agents = agents.agent(grid.center(GridCoord::new(x, 15)), job);
            x += 2;
        }
    }
    let (store, rngs) = agents.build();
    println!("Agents: {}", store.count);

    // 3. Build sim.
    let mut sim = SimBuilder::new(config, grid, store, rngs, AStarFinder::default())
        .buildings(layout())
        .build()?;
    println!("Buildings: {}", sim.buildings.len());
    println!();

    // 4. Run the first half, strike the woods, run the rest.
    let mut obs = SummaryObserver::default();
    let t0 = Instant::now();
    let half = sim.config.total_ticks / 2;
    sim.run_ticks(half, &mut obs)?;

    let impact = sim.grid.center(GridCoord::new(33, 6));
    let report = sim.strike(impact, 2.5, &mut obs)?;
    info!("strike at {impact}: {} killed, {} demolished", report.killed.len(), report.demolished.len());
    println!(
        "{}: strike! {} killed, {} buildings flattened",
        sim.clock.current_tick,
        report.killed.len(),
        report.demolished.len()
    );

    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  living     : {}", sim.agents.living_count());
    println!("  births     : {}", obs.births);
    println!("  nights     : {}", obs.dusks);
    println!("  demolished : {}", obs.demolished);
    println!("  faith      : {:.1}", sim.faith);
    for (cause, n) in &obs.deaths {
        println!("  {n} {cause}");
    }

    let mut stored: BTreeMap<&'static str, u32> = BTreeMap::new();
    for w in sim.buildings.of_kind(BuildingTag::Warehouse).filter_map(|b| b.warehouse()) {
        if let Some(kind) = w.kind() {
            *stored.entry(kind.as_str()).or_default() += w.count();
        }
    }
    println!();
    println!("{:<8} {:>6}", "Stored", "Units");
    println!("{}", "-".repeat(15));
    for (kind, n) in &stored {
        println!("{kind:<8} {n:>6}");
    }

    let site = sim.buildings.iter().find(|b| b.tag() == BuildingTag::House && !b.is_finished());
    match site {
        Some(b) => println!("\nHouse at {} is {:.0}% built", b.footprint.origin, b.construction.progress() * 100.0),
        None => println!("\nAll houses finished"),
    }

    Ok(())
}
