//! Per-agent routine state.

use hm_agent::JobKind;
use hm_core::{AgentId, BuildingId};

use crate::job::{JobRoutine, LegPhase};
use crate::priest::{CaptivePhase, CaptiveRoutine, PriestPhase, PriestRoutine};
use crate::rest::{RestPhase, RestRoutine};
use crate::{Body, TaskContext};

/// What a routine wants the scheduler to do after one synchronous step.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Flow {
    /// Run the next step in the same tick.
    Continue,
    /// Done for this tick.
    Yield,
    /// Night has fallen: run the rest routine until it finishes.
    Rest,
    /// A captive's temple or captor is gone: restore the job routine.
    Release,
}

/// The routine a worker runs when not resting.
#[derive(Clone, Debug)]
pub enum Routine {
    Job(JobRoutine),
    Priest(PriestRoutine),
    Captive(CaptiveRoutine),
}

impl Routine {
    pub fn for_job(job: JobKind) -> Self {
        match job {
            JobKind::Priest => Routine::Priest(PriestRoutine::new()),
            other => Routine::Job(JobRoutine::new(other)),
        }
    }

    pub fn step(&mut self, agent: AgentId, body: &mut Body, ctx: &mut TaskContext<'_>) -> Flow {
        match self {
            Routine::Job(r) => r.step(agent, body, ctx),
            Routine::Priest(r) => r.step(agent, body, ctx),
            Routine::Captive(r) => r.step(agent, body, ctx),
        }
    }
}

/// Coarse label of what a worker is doing, for hosts and tests.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Activity {
    Seek,
    Wait,
    Travel,
    Act,
    FindHouse,
    ToHouse,
    Asleep,
    FindFood,
    Eat,
    FindTemple,
    PickVictim,
    Chase,
    Escort,
    Sacrifice,
    Captive,
}

/// Routine plus movement state of one agent.
#[derive(Clone, Debug)]
pub struct Worker {
    pub job:     JobKind,
    pub body:    Body,
    /// Set while the rest routine has taken over.
    pub rest:    Option<RestRoutine>,
    pub routine: Routine,
}

impl Worker {
    pub fn new(job: JobKind) -> Self {
        Self { job, body: Body::default(), rest: None, routine: Routine::for_job(job) }
    }

    pub fn is_captive(&self) -> bool {
        matches!(self.routine, Routine::Captive(_))
    }

    /// Temple a captive is being led to.
    pub fn captor_temple(&self) -> Option<BuildingId> {
        match &self.routine {
            Routine::Captive(c) => Some(c.temple()),
            _ => None,
        }
    }

    /// Priest holding a captive.
    pub fn captor(&self) -> Option<AgentId> {
        match &self.routine {
            Routine::Captive(c) => Some(c.captor()),
            _ => None,
        }
    }

    pub fn activity(&self) -> Activity {
        if let Some(rest) = &self.rest {
            return match rest.phase() {
                RestPhase::FindHouse | RestPhase::WaitForHouse { .. } => Activity::FindHouse,
                RestPhase::ToHouse { .. } => Activity::ToHouse,
                RestPhase::Asleep { .. } => Activity::Asleep,
                RestPhase::Breakfast { .. } | RestPhase::Eat { .. } => Activity::Eat,
                RestPhase::FindFood { .. } | RestPhase::WaitForFood { .. } | RestPhase::ToFood { .. } => {
                    Activity::FindFood
                }
            };
        }
        match &self.routine {
            Routine::Job(r) => match r.phase() {
                LegPhase::Seek => Activity::Seek,
                LegPhase::Wait { .. } => Activity::Wait,
                LegPhase::Travel => Activity::Travel,
                LegPhase::Act => Activity::Act,
            },
            Routine::Priest(r) => match r.phase() {
                PriestPhase::FindTemple | PriestPhase::Wait { .. } => Activity::FindTemple,
                PriestPhase::PickVictim { .. } => Activity::PickVictim,
                PriestPhase::Chase { .. } => Activity::Chase,
                PriestPhase::Escort { .. } => Activity::Escort,
                PriestPhase::Sacrifice { .. } => Activity::Sacrifice,
            },
            Routine::Captive(r) => match r.phase() {
                CaptivePhase::Seek | CaptivePhase::Wait { .. } | CaptivePhase::Walk | CaptivePhase::Held => {
                    Activity::Captive
                }
            },
        }
    }
}
