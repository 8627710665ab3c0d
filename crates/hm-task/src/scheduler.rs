//! The cooperative scheduler: one resumable routine per agent.

use log::{debug, info, warn};

use hm_agent::{AgentStore, JobKind};
use hm_core::{AgentId, BuildingId};
use hm_grid::GridMap;

use crate::rest::RestFlow;
use crate::worker::{Activity, Flow, Routine, Worker};
use crate::{CaptiveRoutine, Effect, Presentation, RestRoutine, TaskContext, TaskError, TaskResult};

/// An order from outside an agent's own routine.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Command {
    /// Replace the victim's routine with a walk to `temple`, held by `by`.
    Capture { victim: AgentId, by: AgentId, temple: BuildingId },
}

/// Owns every agent's [`Worker`], indexed by `AgentId`.
///
/// Each tick the host calls [`step`](Self::step) once per living agent in id
/// order.  A step runs the agent's routine until it yields, bounded by
/// `TaskConfig::max_sync_steps`, and returns the effects it requested.
#[derive(Default)]
pub struct TaskScheduler {
    workers: Vec<Option<Worker>>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler with a worker for every living agent in `agents`.
    pub fn for_agents(agents: &AgentStore) -> Self {
        let mut scheduler = Self::new();
        for agent in agents.living() {
            scheduler.workers.resize_with(agent.index() + 1, || None);
            scheduler.workers[agent.index()] = Some(Worker::new(agents.job[agent.index()]));
        }
        scheduler
    }

    pub fn add(&mut self, agent: AgentId, job: JobKind) -> TaskResult<()> {
        let i = agent.index();
        if self.workers.len() <= i {
            self.workers.resize_with(i + 1, || None);
        }
        if self.workers[i].is_some() {
            return Err(TaskError::DuplicateWorker(agent));
        }
        self.workers[i] = Some(Worker::new(job));
        Ok(())
    }

    /// Drop an agent's worker (on death).
    pub fn forget(&mut self, agent: AgentId) -> Option<Worker> {
        self.workers.get_mut(agent.index()).and_then(Option::take)
    }

    pub fn worker(&self, agent: AgentId) -> Option<&Worker> {
        self.workers.get(agent.index()).and_then(Option::as_ref)
    }

    pub fn worker_mut(&mut self, agent: AgentId) -> Option<&mut Worker> {
        self.workers.get_mut(agent.index()).and_then(Option::as_mut)
    }

    pub fn presentation(&self, agent: AgentId) -> Option<Presentation> {
        self.worker(agent).map(|w| w.body.presentation)
    }

    pub fn activity(&self, agent: AgentId) -> Option<Activity> {
        self.worker(agent).map(Worker::activity)
    }

    /// Number of agents with a worker.
    pub fn len(&self) -> usize {
        self.workers.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn deliver(&mut self, command: Command, agents: &mut AgentStore) -> TaskResult<()> {
        match command {
            Command::Capture { victim, by, temple } => {
                let worker = self.worker_mut(victim).ok_or(TaskError::NoWorker(victim))?;
                worker.routine = Routine::Captive(CaptiveRoutine::new(by, temple));
                worker.rest = None;
                worker.body.motion.abort();
                worker.body.acting = None;
                agents.captured[victim.index()] = true;
                agents.sleeping[victim.index()] = false;
                info!("{victim} is led to {temple} by {by}");
                Ok(())
            }
        }
    }

    /// Abort every path that now crosses an unwalkable cell.  Call after any
    /// occupancy change.  Returns how many paths were aborted.
    pub fn revalidate(&mut self, grid: &GridMap) -> usize {
        let mut aborted = 0;
        for (i, slot) in self.workers.iter_mut().enumerate() {
            let Some(worker) = slot else { continue };
            if worker.body.motion.is_blocked(grid) {
                debug!("{}: path blocked by new occupancy", AgentId(i as u32));
                worker.body.motion.abort();
                aborted += 1;
            }
        }
        aborted
    }

    /// Run `agent`'s routine for one tick and return the effects it emitted.
    ///
    /// Unknown or dead agents do nothing.
    pub fn step(&mut self, agent: AgentId, ctx: &mut TaskContext<'_>) -> Vec<Effect> {
        let i = agent.index();
        let Some(worker) = self.workers.get_mut(i).and_then(Option::as_mut) else {
            return Vec::new();
        };
        if !ctx.agents.is_alive(agent) {
            return Vec::new();
        }

        let before = ctx.position(agent);
        let limit = ctx.config.max_sync_steps;
        let mut yielded = false;
        for _ in 0..limit {
            let flow = if let Some(rest) = worker.rest.as_mut() {
                match rest.step(agent, &mut worker.body, ctx) {
                    RestFlow::Continue => Flow::Continue,
                    RestFlow::Yield => Flow::Yield,
                    RestFlow::Done => {
                        debug!("{agent}: rested, back to work");
                        worker.rest = None;
                        Flow::Continue
                    }
                }
            } else {
                worker.routine.step(agent, &mut worker.body, ctx)
            };
            match flow {
                Flow::Continue => {}
                Flow::Yield => {
                    yielded = true;
                    break;
                }
                Flow::Rest => {
                    debug!("{agent}: night falls, resting");
                    worker.body.motion.clear();
                    worker.rest = Some(RestRoutine::new());
                }
                Flow::Release => {
                    info!("{agent} is released");
                    worker.routine = Routine::for_job(worker.job);
                    worker.body.motion.clear();
                    worker.body.acting = None;
                    ctx.agents.captured[i] = false;
                }
            }
        }
        if !yielded {
            warn!("{agent}: {limit} steps without yielding, forcing a yield");
        }

        let after = ctx.position(agent);
        worker
            .body
            .present(before, after, ctx.dt, ctx.agents.holding[i], ctx.agents.sleeping[i]);
        std::mem::take(&mut ctx.effects)
    }
}
