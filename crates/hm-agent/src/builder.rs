//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use hm_agent::{AgentStoreBuilder, JobKind};
//! use hm_core::WorldPos;
//!
//! let (store, rngs) = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .agent(WorldPos::new(0.5, 0.0, 0.5), JobKind::Farmer)
//!     .agents(3, WorldPos::new(4.5, 0.0, 4.5), JobKind::Logger)
//!     .build();
//!
//! assert_eq!(store.count, 4);
//! assert_eq!(rngs.len(),  4);
//! ```

use hm_core::WorldPos;

use crate::{AgentRngs, AgentStore, JobKind};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
pub struct AgentStoreBuilder {
    seed:   u64,
    agents: Vec<(WorldPos, JobKind)>,
}

impl AgentStoreBuilder {
    /// Create an empty builder using `seed` as the global RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, agents: Vec::new() }
    }

    /// Add one agent.  Ids are assigned in call order starting at 0.
    pub fn agent(mut self, position: WorldPos, job: JobKind) -> Self {
        self.agents.push((position, job));
        self
    }

    /// Add `n` agents sharing a position and job.
    pub fn agents(mut self, n: usize, position: WorldPos, job: JobKind) -> Self {
        self.agents.extend(std::iter::repeat_n((position, job), n));
        self
    }

    pub fn build(self) -> (AgentStore, AgentRngs) {
        let store = AgentStore::new(&self.agents);
        let rngs = AgentRngs::new(self.agents.len(), self.seed);
        (store, rngs)
    }
}
