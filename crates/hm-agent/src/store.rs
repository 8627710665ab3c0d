//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! A worker step needs `&mut AgentRng` for its own random choices while also
//! reading and writing other agents' state through `&mut AgentStore`.  Keeping
//! the RNGs in a separate `AgentRngs` lets both borrows coexist:
//!
//! ```ignore
//! let rng = sim.rngs.get_mut(agent);
//! scheduler.step(agent, &mut sim.agents, rng, ...);
//! ```

use hm_core::{AgentId, AgentRng, BuildingId, ResourceKind, WorldPos};

use crate::{JobKind, StatusEffects};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`].
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
    seed:      u64,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner, seed: global_seed }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    /// Seed the RNG for the next spawned agent.  Must be called once per
    /// [`AgentStore::push_agent`] so indices stay aligned.
    pub fn push(&mut self) {
        let id = AgentId(self.inner.len() as u32);
        self.inner.push(AgentRng::new(self.seed, id));
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them.  Dead agents keep their slot with `alive = false`
/// so ids are never reused.
pub struct AgentStore {
    /// Number of agent slots (living and dead).
    pub count: usize,

    // ── Spatial state ─────────────────────────────────────────────────────
    /// Continuous world position.
    pub position: Vec<WorldPos>,

    // ── Life cycle ────────────────────────────────────────────────────────
    pub job:      Vec<JobKind>,
    pub alive:    Vec<bool>,
    /// Sleepers are inside a house: hidden and excluded from the active pool.
    pub sleeping: Vec<bool>,
    /// Seized by a priest; the agent's own job no longer runs.
    pub captured: Vec<bool>,

    // ── Economy ───────────────────────────────────────────────────────────
    /// Resource in hand, if any.
    pub holding: Vec<Option<ResourceKind>>,
    /// House the agent last slept in.
    pub home:    Vec<Option<BuildingId>>,
    pub status:  Vec<StatusEffects>,
}

impl AgentStore {
    /// `true` if there are no agent slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order, dead included.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Living agents in ascending id order.
    pub fn living(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids().filter(|&a| self.alive[a.index()])
    }

    pub fn living_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// `false` for unknown ids.
    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.alive.get(agent.index()).copied().unwrap_or(false)
    }

    /// Alive and not asleep.
    #[inline]
    pub fn is_active(&self, agent: AgentId) -> bool {
        self.is_alive(agent) && !self.sleeping[agent.index()]
    }

    /// Append a new agent and return its id.  Pair with [`AgentRngs::push`].
    pub fn push_agent(&mut self, position: WorldPos, job: JobKind) -> AgentId {
        let id = AgentId(self.count as u32);
        self.position.push(position);
        self.job.push(job);
        self.alive.push(true);
        self.sleeping.push(false);
        self.captured.push(false);
        self.holding.push(None);
        self.home.push(None);
        self.status.push(StatusEffects::default());
        self.count += 1;
        id
    }

    // ── Package-private constructor used by AgentStoreBuilder ─────────────

    pub(crate) fn new(agents: &[(WorldPos, JobKind)]) -> Self {
        let count = agents.len();
        Self {
            count,
            position: agents.iter().map(|&(p, _)| p).collect(),
            job:      agents.iter().map(|&(_, j)| j).collect(),
            alive:    vec![true; count],
            sleeping: vec![false; count],
            captured: vec![false; count],
            holding:  vec![None; count],
            home:     vec![None; count],
            status:   vec![StatusEffects::default(); count],
        }
    }
}
