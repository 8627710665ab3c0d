//! `hm-agent` — Structure-of-Arrays agent storage for the `hamlet` simulation.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`job`]     | `JobKind`, `StatusEffects`, `DeathCause`                  |
//! | [`store`]   | `AgentStore` (SoA arrays), `AgentRngs` (per-agent RNG)    |
//! | [`builder`] | `AgentStoreBuilder` (fluent construction)                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on plain-data types. |

pub mod builder;
pub mod job;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use job::{DeathCause, JobKind, StatusEffects};
pub use store::{AgentRngs, AgentStore};
