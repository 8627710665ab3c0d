//! `hm-sim` — tick loop orchestrator for the `hamlet` settlement simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Clock        — advance the day/night cycle; report dusk / dawn.
//!   ② Construction — advance build progress on every supplied site.
//!   ③ Agents       — for each living agent in ascending AgentId order:
//!                      TaskScheduler::step  (routine runs until it yields)
//!                      apply its effects immediately:
//!                        Demolish  → remove building, revalidate paths
//!                        Spawn     → new agent + worker, moved into home
//!                        Die       → kill, evict, drop worker
//!                        Capture   → Command::Capture to the victim's worker
//!                        Sacrifice → faith += n, kill victim
//!   ④ Advance the tick counter.
//! ```
//!
//! Host hooks outside the loop: [`Sim::place_building`],
//! [`Sim::remove_building`], [`Sim::spawn_agent`], [`Sim::kill_agent`],
//! [`Sim::strike`].  Every occupancy change is followed by a path
//! revalidation pass over all workers.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hm_agent::{AgentStoreBuilder, JobKind};
//! use hm_core::{SimConfig, WorldPos};
//! use hm_grid::{AStarFinder, GridMap};
//! use hm_sim::{NoopObserver, SimBuilder};
//!
//! let config = SimConfig::default();
//! let grid = GridMap::new(32, 32, WorldPos::ZERO, 1.0)?;
//! let (store, rngs) = AgentStoreBuilder::new(config.seed)
//!     .agents(10, WorldPos::new(0.5, 0.0, 0.5), JobKind::Farmer)
//!     .build();
//! let mut sim = SimBuilder::new(config, grid, store, rngs, AStarFinder::default()).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, StrikeReport};
