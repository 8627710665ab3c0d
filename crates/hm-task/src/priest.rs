//! Priest pursuit and the captive's walk to the altar.

use log::{debug, info};

use hm_agent::JobKind;
use hm_building::BuildingTag;
use hm_core::{AgentId, BuildingId};

use crate::{Body, Effect, Flow, MoveStatus, TaskContext};

// ── Priest ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PriestPhase {
    FindTemple,
    Wait { remaining: f32 },
    PickVictim { temple: BuildingId },
    Chase {
        temple:    BuildingId,
        victim:    AgentId,
        /// Ticks until the path to the victim is recomputed.
        repath_in: u32,
        /// Consecutive searches that found no path.
        failures:  u32,
    },
    Escort {
        temple:  BuildingId,
        victim:  AgentId,
        elapsed: f32,
        arrived: bool,
    },
    Sacrifice {
        temple:  BuildingId,
        victim:  AgentId,
        started: bool,
    },
}

/// Finds a free temple, chases a random villager, escorts it to the altar
/// and sacrifices it.
#[derive(Clone, Debug)]
pub struct PriestRoutine {
    phase: PriestPhase,
}

impl Default for PriestRoutine {
    fn default() -> Self {
        Self::new()
    }
}

impl PriestRoutine {
    pub fn new() -> Self {
        Self { phase: PriestPhase::FindTemple }
    }

    pub fn phase(&self) -> PriestPhase {
        self.phase
    }

    pub fn step(&mut self, agent: AgentId, body: &mut Body, ctx: &mut TaskContext<'_>) -> Flow {
        match self.phase {
            PriestPhase::FindTemple => {
                if ctx.night {
                    return Flow::Rest;
                }
                match ctx.nearest(agent, BuildingTag::Temple, |b| b.can_sacrifice()) {
                    Some(hit) => {
                        self.phase = PriestPhase::PickVictim { temple: hit.building };
                        Flow::Continue
                    }
                    None => {
                        self.phase = PriestPhase::Wait { remaining: ctx.config.retry_secs };
                        Flow::Yield
                    }
                }
            }

            PriestPhase::Wait { remaining } => {
                let left = remaining - ctx.dt;
                if left > 0.0 {
                    self.phase = PriestPhase::Wait { remaining: left };
                    return Flow::Yield;
                }
                self.phase = PriestPhase::FindTemple;
                Flow::Continue
            }

            PriestPhase::PickVictim { temple } => {
                if !ctx.buildings.contains(temple) {
                    self.phase = PriestPhase::FindTemple;
                    return Flow::Continue;
                }
                let agents = &*ctx.agents;
                let candidates: Vec<AgentId> = agents
                    .living()
                    .filter(|&a| {
                        a != agent
                            && agents.is_active(a)
                            && !agents.captured[a.index()]
                            && agents.job[a.index()] != JobKind::Priest
                    })
                    .collect();
                match ctx.rng.choose(&candidates).copied() {
                    Some(victim) => {
                        debug!("{agent}: chasing {victim}");
                        self.phase = PriestPhase::Chase { temple, victim, repath_in: 0, failures: 0 };
                        Flow::Continue
                    }
                    None => {
                        self.phase = PriestPhase::Wait { remaining: ctx.config.retry_secs };
                        Flow::Yield
                    }
                }
            }

            PriestPhase::Chase { temple, victim, repath_in, failures } => {
                self.chase(agent, temple, victim, repath_in, failures, body, ctx)
            }

            PriestPhase::Escort { temple, victim, elapsed, arrived } => {
                if !ctx.agents.is_alive(victim) || !ctx.buildings.contains(temple) {
                    body.motion.clear();
                    self.phase = PriestPhase::FindTemple;
                    return Flow::Continue;
                }
                let mut arrived = arrived;
                if !arrived {
                    if !body.motion.is_travelling() {
                        match ctx.nearest_any(agent, |b| b.id == temple) {
                            Some(hit) => body.motion.start(hit.cell, hit.path),
                            // Cut off from the altar: wait for the captive there.
                            None => arrived = true,
                        }
                    }
                    if !arrived {
                        match body.travel(agent, ctx) {
                            MoveStatus::Arrived => arrived = true,
                            MoveStatus::Aborted => body.motion.clear(),
                            MoveStatus::Moving => {}
                        }
                    }
                }
                let elapsed = elapsed + ctx.dt;
                let victim_ready = ctx.is_interaction_cell(temple, ctx.cell_of(victim));
                if (arrived && victim_ready) || elapsed >= ctx.config.escort_timeout_secs {
                    body.motion.clear();
                    self.phase = PriestPhase::Sacrifice { temple, victim, started: false };
                    return Flow::Continue;
                }
                self.phase = PriestPhase::Escort { temple, victim, elapsed, arrived };
                Flow::Yield
            }

            PriestPhase::Sacrifice { temple, victim, started } => {
                let temple_standing = ctx.buildings.contains(temple);
                if !ctx.agents.is_alive(victim) || !temple_standing {
                    if started && temple_standing {
                        if let Some(t) = ctx.buildings.get_mut(temple).and_then(|b| b.temple_mut()) {
                            t.end_sacrifice();
                        }
                    }
                    body.acting = None;
                    self.phase = PriestPhase::FindTemple;
                    return Flow::Continue;
                }
                if !started {
                    let Some(t) = ctx.buildings.get_mut(temple).and_then(|b| b.temple_mut()) else {
                        self.phase = PriestPhase::FindTemple;
                        return Flow::Continue;
                    };
                    if !t.start_sacrifice(agent) {
                        // Another priest holds the altar.
                        return Flow::Yield;
                    }
                    self.phase = PriestPhase::Sacrifice { temple, victim, started: true };
                }
                let focus = ctx.position(victim);
                if body.act(ctx.dt, ctx.config.sacrifice_secs, 1.0, focus) {
                    return Flow::Yield;
                }
                let faith = ctx
                    .buildings
                    .get_mut(temple)
                    .and_then(|b| b.temple_mut())
                    .map_or(0.0, |t| {
                        t.end_sacrifice();
                        t.faith_per_sacrifice
                    });
                info!("{agent}: sacrificed {victim} at {temple} (+{faith} faith)");
                ctx.emit(Effect::Sacrifice { victim, faith });
                self.phase = PriestPhase::FindTemple;
                Flow::Yield
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn chase(
        &mut self,
        agent:     AgentId,
        temple:    BuildingId,
        victim:    AgentId,
        repath_in: u32,
        failures:  u32,
        body:      &mut Body,
        ctx:       &mut TaskContext<'_>,
    ) -> Flow {
        let available = ctx.agents.is_active(victim) && !ctx.agents.captured[victim.index()];
        if !available || !ctx.buildings.contains(temple) {
            debug!("{agent}: lost {victim}");
            body.motion.clear();
            self.phase = PriestPhase::PickVictim { temple };
            return Flow::Continue;
        }

        let me = ctx.position(agent);
        let them = ctx.position(victim);
        if me.ground_distance(them) <= ctx.config.contact_radius {
            info!("{agent}: caught {victim}");
            body.motion.clear();
            ctx.emit(Effect::Capture { victim, by: agent, temple });
            self.phase = PriestPhase::Escort { temple, victim, elapsed: 0.0, arrived: false };
            return Flow::Yield;
        }

        let mut repath_in = repath_in;
        let mut failures = failures;
        if repath_in == 0 || !body.motion.is_travelling() {
            let from = ctx.cell_of(agent);
            let to = ctx.cell_of(victim);
            match ctx.finder.path(ctx.grid, from, to) {
                Some(path) => {
                    body.motion.start(to, path);
                    repath_in = ctx.config.priest_repath_ticks;
                    failures = 0;
                }
                None if from.chebyshev(to) <= 1 => {
                    // Adjacent but no grid path (corner cut or a blocked cell):
                    // close the gap in a straight line.
                    body.motion.clear();
                    let step = ctx.config.velocity * ctx.dt;
                    ctx.agents.position[agent.index()] = me.step_towards(them, step).0;
                    self.phase = PriestPhase::Chase { temple, victim, repath_in: 0, failures };
                    return Flow::Yield;
                }
                None => {
                    failures += 1;
                    if failures > ctx.config.priest_retry_budget {
                        debug!("{agent}: no way to reach {victim}, giving up");
                        body.motion.clear();
                        self.phase = PriestPhase::PickVictim { temple };
                        return Flow::Yield;
                    }
                    self.phase = PriestPhase::Chase { temple, victim, repath_in: 0, failures };
                    return Flow::Yield;
                }
            }
        }

        if body.travel(agent, ctx) == MoveStatus::Aborted {
            body.motion.clear();
            repath_in = 0;
        } else {
            repath_in = repath_in.saturating_sub(1);
        }
        self.phase = PriestPhase::Chase { temple, victim, repath_in, failures };
        Flow::Yield
    }
}

// ── Captive ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum CaptivePhase {
    Seek,
    Wait { remaining: f32 },
    Walk,
    /// At the altar, waiting for the end.
    Held,
}

/// Replaces a captured agent's routine: walk to the temple and stay there.
/// Releases the agent when the temple disappears or its captor dies.
#[derive(Clone, Debug)]
pub struct CaptiveRoutine {
    captor: AgentId,
    temple: BuildingId,
    phase:  CaptivePhase,
}

impl CaptiveRoutine {
    pub fn new(captor: AgentId, temple: BuildingId) -> Self {
        Self { captor, temple, phase: CaptivePhase::Seek }
    }

    pub fn captor(&self) -> AgentId {
        self.captor
    }

    pub fn temple(&self) -> BuildingId {
        self.temple
    }

    pub fn phase(&self) -> CaptivePhase {
        self.phase
    }

    pub fn step(&mut self, agent: AgentId, body: &mut Body, ctx: &mut TaskContext<'_>) -> Flow {
        let temple = self.temple;
        if !ctx.buildings.contains(temple) || !ctx.agents.is_alive(self.captor) {
            return Flow::Release;
        }
        match self.phase {
            CaptivePhase::Seek => match ctx.nearest_any(agent, |b| b.id == temple) {
                Some(hit) => {
                    body.motion.start(hit.cell, hit.path);
                    self.phase = CaptivePhase::Walk;
                    Flow::Continue
                }
                None => {
                    self.phase = CaptivePhase::Wait { remaining: ctx.config.retry_secs };
                    Flow::Yield
                }
            },
            CaptivePhase::Wait { remaining } => {
                let left = remaining - ctx.dt;
                self.phase = if left > 0.0 { CaptivePhase::Wait { remaining: left } } else { CaptivePhase::Seek };
                Flow::Yield
            }
            CaptivePhase::Walk => match body.travel(agent, ctx) {
                MoveStatus::Moving => Flow::Yield,
                MoveStatus::Aborted => {
                    body.motion.clear();
                    self.phase = CaptivePhase::Seek;
                    Flow::Continue
                }
                MoveStatus::Arrived => {
                    self.phase = CaptivePhase::Held;
                    Flow::Yield
                }
            },
            CaptivePhase::Held => Flow::Yield,
        }
    }
}
