//! Deterministic per-agent RNG.
//!
//! Every agent owns an independent `SmallRng` seeded from the run seed and its
//! id, mixed with the 64-bit golden-ratio constant so neighbouring ids land
//! far apart in seed space.  A newborn gets exactly the stream its id would
//! have had at start-up, which keeps a run reproducible no matter when births
//! happen.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::AgentId;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent random stream.  Priests draw victims from it; breeders draw the
/// job of a newborn.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(run_seed: u64, agent: AgentId) -> Self {
        let mixed = run_seed ^ u64::from(agent.0).wrapping_mul(GOLDEN_GAMMA);
        AgentRng(SmallRng::seed_from_u64(mixed))
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}
