//! Night-time interrupt: find a bed, sleep, and eat on waking.

use log::{debug, info};

use hm_agent::DeathCause;
use hm_building::BuildingTag;
use hm_core::{AgentId, BuildingId, ResourceKind};

use crate::{Body, Effect, MoveStatus, TaskContext};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RestFlow {
    Continue,
    Yield,
    /// Rested and fed; the job routine takes over again.
    Done,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum RestPhase {
    FindHouse,
    WaitForHouse { remaining: f32 },
    ToHouse { house: BuildingId },
    Asleep { house: BuildingId },
    /// Morning: eat from the house pantry or from hand.
    Breakfast { house: Option<BuildingId> },
    FindFood { deadline: f32 },
    WaitForFood { remaining: f32, deadline: f32 },
    ToFood { warehouse: BuildingId, deadline: f32 },
    Eat { warehouse: BuildingId, deadline: f32 },
}

impl RestPhase {
    fn deadline(self) -> Option<f32> {
        match self {
            RestPhase::FindFood { deadline }
            | RestPhase::WaitForFood { deadline, .. }
            | RestPhase::ToFood { deadline, .. } => Some(deadline),
            _ => None,
        }
    }
}

/// Runs in place of the job routine from nightfall until the agent has
/// eaten.  An agent that wakes hungry and cannot reach food before the
/// starvation deadline dies.
#[derive(Clone, Debug)]
pub struct RestRoutine {
    phase: RestPhase,
}

impl Default for RestRoutine {
    fn default() -> Self {
        Self::new()
    }
}

impl RestRoutine {
    pub fn new() -> Self {
        Self { phase: RestPhase::FindHouse }
    }

    pub fn phase(&self) -> RestPhase {
        self.phase
    }

    pub fn step(&mut self, agent: AgentId, body: &mut Body, ctx: &mut TaskContext<'_>) -> RestFlow {
        let i = agent.index();
        if let Some(deadline) = self.phase.deadline() {
            if ctx.now >= deadline {
                info!("{agent} {}", DeathCause::Starved);
                body.motion.clear();
                ctx.emit(Effect::Die { agent, cause: DeathCause::Starved });
                return RestFlow::Yield;
            }
        }
        match self.phase {
            RestPhase::FindHouse => {
                if !ctx.night {
                    self.phase = RestPhase::Breakfast { house: None };
                    return RestFlow::Continue;
                }
                let home = ctx.agents.home[i];
                let own = home.and_then(|h| ctx.nearest_any(agent, |b| b.id == h && b.is_finished()));
                let found = own.or_else(|| {
                    ctx.nearest(agent, BuildingTag::House, |b| {
                        b.is_finished() && b.house().is_some_and(|h| h.is_inhabitant(agent) || h.has_room())
                    })
                });
                match found {
                    Some(hit) => {
                        body.motion.start(hit.cell, hit.path);
                        self.phase = RestPhase::ToHouse { house: hit.building };
                        RestFlow::Continue
                    }
                    None => {
                        self.phase = RestPhase::WaitForHouse { remaining: ctx.config.retry_secs };
                        RestFlow::Yield
                    }
                }
            }

            RestPhase::WaitForHouse { remaining } => {
                if !ctx.night {
                    self.phase = RestPhase::Breakfast { house: None };
                    return RestFlow::Continue;
                }
                self.phase = countdown(remaining, ctx.dt)
                    .map_or(RestPhase::FindHouse, |remaining| RestPhase::WaitForHouse { remaining });
                RestFlow::Yield
            }

            RestPhase::ToHouse { house } => match body.travel(agent, ctx) {
                MoveStatus::Moving => RestFlow::Yield,
                MoveStatus::Aborted => {
                    body.motion.clear();
                    self.phase = RestPhase::FindHouse;
                    RestFlow::Continue
                }
                MoveStatus::Arrived => {
                    let moved_in = ctx
                        .buildings
                        .get_mut(house)
                        .and_then(|b| b.house_mut())
                        .is_some_and(|h| h.inhabit(agent));
                    if !moved_in {
                        self.phase = RestPhase::FindHouse;
                        return RestFlow::Continue;
                    }
                    if let Some(old) = ctx.agents.home[i].filter(|&old| old != house) {
                        if let Some(h) = ctx.buildings.get_mut(old).and_then(|b| b.house_mut()) {
                            h.evict(agent);
                        }
                    }
                    debug!("{agent}: asleep in {house}");
                    ctx.agents.home[i] = Some(house);
                    ctx.agents.sleeping[i] = true;
                    self.phase = RestPhase::Asleep { house };
                    RestFlow::Yield
                }
            },

            RestPhase::Asleep { house } => {
                if !ctx.buildings.contains(house) {
                    ctx.agents.sleeping[i] = false;
                    ctx.agents.home[i] = None;
                    self.phase = RestPhase::FindHouse;
                    return RestFlow::Continue;
                }
                if ctx.night {
                    return RestFlow::Yield;
                }
                ctx.agents.sleeping[i] = false;
                self.phase = RestPhase::Breakfast { house: Some(house) };
                RestFlow::Continue
            }

            RestPhase::Breakfast { house } => {
                let from_pantry = house
                    .and_then(|h| ctx.buildings.get_mut(h))
                    .and_then(|b| b.house_mut())
                    .is_some_and(|h| h.take_food());
                if from_pantry {
                    ctx.agents.status[i].hungry = false;
                    return RestFlow::Done;
                }
                if ctx.agents.holding[i] == Some(ResourceKind::Food) {
                    ctx.agents.holding[i] = None;
                    ctx.agents.status[i].hungry = false;
                    return RestFlow::Done;
                }
                debug!("{agent}: woke up hungry");
                ctx.agents.status[i].hungry = true;
                self.phase = RestPhase::FindFood { deadline: ctx.now + ctx.config.starvation_secs };
                RestFlow::Continue
            }

            RestPhase::FindFood { deadline } => {
                let found = ctx.nearest(agent, BuildingTag::Warehouse, |b| {
                    b.is_finished() && b.warehouse().is_some_and(|w| w.has(ResourceKind::Food))
                });
                match found {
                    Some(hit) => {
                        body.motion.start(hit.cell, hit.path);
                        self.phase = RestPhase::ToFood { warehouse: hit.building, deadline };
                        RestFlow::Continue
                    }
                    None => {
                        self.phase = RestPhase::WaitForFood { remaining: ctx.config.retry_secs, deadline };
                        RestFlow::Yield
                    }
                }
            }

            RestPhase::WaitForFood { remaining, deadline } => {
                self.phase = countdown(remaining, ctx.dt).map_or(RestPhase::FindFood { deadline }, |remaining| {
                    RestPhase::WaitForFood { remaining, deadline }
                });
                RestFlow::Yield
            }

            RestPhase::ToFood { warehouse, deadline } => match body.travel(agent, ctx) {
                MoveStatus::Moving => RestFlow::Yield,
                MoveStatus::Aborted => {
                    body.motion.clear();
                    self.phase = RestPhase::FindFood { deadline };
                    RestFlow::Continue
                }
                MoveStatus::Arrived => {
                    self.phase = RestPhase::Eat { warehouse, deadline };
                    RestFlow::Continue
                }
            },

            RestPhase::Eat { warehouse, deadline } => {
                let Some(focus) = ctx.buildings.get(warehouse).map(|b| ctx.grid.footprint_center(b.footprint))
                else {
                    body.acting = None;
                    self.phase = RestPhase::FindFood { deadline };
                    return RestFlow::Continue;
                };
                if body.act(ctx.dt, ctx.config.eat_secs, 0.5, focus) {
                    return RestFlow::Yield;
                }
                let ate = ctx
                    .buildings
                    .get_mut(warehouse)
                    .and_then(|b| b.warehouse_mut())
                    .is_some_and(|w| w.remove(ResourceKind::Food));
                if ate {
                    ctx.agents.status[i].hungry = false;
                    return RestFlow::Done;
                }
                self.phase = RestPhase::FindFood { deadline };
                RestFlow::Continue
            }
        }
    }
}

/// `Some(left)` while a wait of `remaining` seconds has time left after `dt`.
fn countdown(remaining: f32, dt: f32) -> Option<f32> {
    let left = remaining - dt;
    (left > 0.0).then_some(left)
}
