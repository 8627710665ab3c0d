//! The plan-driven routine shared by farmers, loggers, builders and breeders.

use log::debug;

use hm_agent::JobKind;
use hm_building::{Building, BuildingTag};
use hm_core::{AgentId, BuildingId, ResourceKind};

use crate::plan::{Action, Leg, plan_for};
use crate::{Body, Effect, Flow, MoveStatus, TaskContext};

/// Where the routine is within the current leg.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LegPhase {
    /// Look for the nearest building matching the leg's goal.
    Seek,
    /// Nothing matched; search again when `remaining` runs out.
    Wait { remaining: f32 },
    Travel,
    Act,
}

/// Cycles through a job's [`plan`](crate::plan::plan_for) forever.
///
/// The routine only hands over to the rest routine while seeking, so a night
/// never interrupts a walk or an act half way.
#[derive(Clone, Debug)]
pub struct JobRoutine {
    plan:   &'static [Leg],
    leg:    usize,
    phase:  LegPhase,
    target: Option<BuildingId>,
}

impl JobRoutine {
    pub fn new(job: JobKind) -> Self {
        Self { plan: plan_for(job), leg: 0, phase: LegPhase::Seek, target: None }
    }

    pub fn leg(&self) -> usize {
        self.leg
    }

    pub fn phase(&self) -> LegPhase {
        self.phase
    }

    pub fn target(&self) -> Option<BuildingId> {
        self.target
    }

    pub fn step(&mut self, agent: AgentId, body: &mut Body, ctx: &mut TaskContext<'_>) -> Flow {
        let Some(&leg) = self.plan.get(self.leg) else {
            return Flow::Yield;
        };
        match self.phase {
            LegPhase::Seek => self.seek(agent, leg, body, ctx),

            LegPhase::Wait { remaining } => {
                let left = remaining - ctx.dt;
                if left > 0.0 {
                    self.phase = LegPhase::Wait { remaining: left };
                    return Flow::Yield;
                }
                self.phase = LegPhase::Seek;
                Flow::Continue
            }

            LegPhase::Travel => match body.travel(agent, ctx) {
                MoveStatus::Moving => Flow::Yield,
                MoveStatus::Aborted => {
                    debug!("{agent}: path to {:?} blocked, searching again", self.target);
                    body.motion.clear();
                    self.phase = LegPhase::Seek;
                    Flow::Continue
                }
                MoveStatus::Arrived => {
                    let still_wanted = self
                        .target
                        .and_then(|id| ctx.buildings.get(id))
                        .is_some_and(|b| leg.goal.accepts(b, ctx.now));
                    if still_wanted {
                        self.phase = LegPhase::Act;
                    } else {
                        debug!("{agent}: {:?} no longer matches {:?}", self.target, leg.goal);
                        self.phase = LegPhase::Seek;
                    }
                    Flow::Continue
                }
            },

            LegPhase::Act => {
                let focus = self
                    .target
                    .and_then(|id| ctx.buildings.get(id))
                    .map_or(ctx.position(agent), |b| ctx.grid.footprint_center(b.footprint));
                if body.act(ctx.dt, leg.action.duration(ctx.config), 1.0, focus) {
                    return Flow::Yield;
                }
                let done = self.target.is_some_and(|id| perform(leg.action, agent, id, ctx));
                if done {
                    self.leg = (self.leg + 1) % self.plan.len();
                } else {
                    debug!("{agent}: {:?} on {:?} failed", leg.action, self.target);
                }
                self.target = None;
                self.phase = LegPhase::Seek;
                Flow::Continue
            }
        }
    }

    fn seek(&mut self, agent: AgentId, leg: Leg, body: &mut Body, ctx: &mut TaskContext<'_>) -> Flow {
        if ctx.night {
            return Flow::Rest;
        }
        let holding = ctx.agents.holding[agent.index()];
        if self.leg != 0 && leg.action.requires().is_some_and(|k| holding != Some(k)) {
            // Lost the load (eaten, for instance): start the cycle over.
            self.leg = 0;
            return Flow::Continue;
        }
        if let Some(k) = holding {
            // Carrying what a later leg needs, as a released captive may be:
            // go straight to that leg.
            if leg.action.requires() != Some(k) {
                if let Some(next) = self.plan.iter().position(|l| l.action.requires() == Some(k)) {
                    self.leg = next;
                    return Flow::Continue;
                }
            }
        }
        let now = ctx.now;
        let accepts = |b: &Building| leg.goal.accepts(b, now);
        let found = match leg.goal.tag() {
            Some(tag) => ctx.nearest(agent, tag, accepts),
            None => ctx.nearest_any(agent, accepts),
        };
        match found {
            Some(hit) => {
                debug!("{agent}: heading to {} at {} ({:.1})", hit.building, hit.cell, hit.distance);
                self.target = Some(hit.building);
                body.motion.start(hit.cell, hit.path);
                self.phase = LegPhase::Travel;
                Flow::Continue
            }
            None => {
                self.target = None;
                self.phase = LegPhase::Wait { remaining: ctx.config.retry_secs };
                Flow::Yield
            }
        }
    }
}

/// Apply `action` to building `target`.  `false` leaves the world unchanged.
fn perform(action: Action, agent: AgentId, target: BuildingId, ctx: &mut TaskContext<'_>) -> bool {
    let i = agent.index();
    let Some(b) = ctx.buildings.get_mut(target) else {
        return false;
    };
    let holding = ctx.agents.holding[i];
    match action {
        Action::Harvest => {
            if holding.is_some() || !b.field_mut().is_some_and(|f| f.harvest(ctx.now)) {
                return false;
            }
            ctx.agents.holding[i] = Some(ResourceKind::Food);
            true
        }
        Action::Fell => {
            if holding.is_some() || b.tag() != BuildingTag::Tree {
                return false;
            }
            ctx.agents.holding[i] = Some(ResourceKind::Wood);
            ctx.effects.push(Effect::Demolish(target));
            true
        }
        Action::Deposit(k) => {
            if holding != Some(k) || !b.warehouse_mut().is_some_and(|w| w.add(k)) {
                return false;
            }
            ctx.agents.holding[i] = None;
            true
        }
        Action::Withdraw(k) => {
            if holding == Some(k) {
                return true;
            }
            if holding.is_some() || !b.warehouse_mut().is_some_and(|w| w.remove(k)) {
                return false;
            }
            ctx.agents.holding[i] = Some(k);
            true
        }
        Action::Deliver => {
            if holding != Some(ResourceKind::Wood) || !b.construction.provide_wood() {
                return false;
            }
            ctx.agents.holding[i] = None;
            true
        }
        Action::Feed => {
            if holding != Some(ResourceKind::Food) {
                return false;
            }
            let Some(house) = b.house_mut() else { return false };
            let birth = house.feed();
            ctx.agents.holding[i] = None;
            if birth {
                let job = ctx.rng.choose(&JobKind::NEWBORN).copied().unwrap_or(JobKind::Farmer);
                debug!("{agent}: fed {target}, a {job} is born");
                ctx.effects.push(Effect::Spawn {
                    position: ctx.agents.position[i],
                    job,
                    home: Some(target),
                });
            }
            true
        }
    }
}
