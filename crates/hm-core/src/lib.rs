//! `hm-core` — foundational types for the `hamlet` settlement simulation.
//!
//! This crate is a dependency of every other `hm-*` crate.  It has no `hm-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`ids`]      | `AgentId`, `BuildingId`                                 |
//! | [`geo`]      | `GridCoord`, `WorldPos`                                 |
//! | [`time`]     | `Tick`, `SimClock`, `SimConfig`                         |
//! | [`clock`]    | `WorldClock` (day/night phase), `DayPhase` trait        |
//! | [`rng`]      | `AgentRng`: per-agent deterministic stream              |
//! | [`resource`] | `ResourceKind` enum                                     |
//! | [`error`]    | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod clock;
pub mod error;
pub mod geo;
pub mod ids;
pub mod resource;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::{DayPhase, WorldClock};
pub use error::{CoreError, CoreResult};
pub use geo::{GridCoord, WorldPos};
pub use ids::{AgentId, BuildingId};
pub use resource::ResourceKind;
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, Tick};
