//! `hm-task` — cooperative per-agent task scheduling for the `hamlet` simulation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`config`]    | `TaskConfig` (speeds, act durations, retry and deadline timers) |
//! | [`context`]   | `TaskContext<'a>` — world access for one agent's step           |
//! | [`effect`]    | `Effect` — world changes a step asks the host to apply          |
//! | [`motion`]    | `Motion`, `Acting`, `Body`, `Presentation`                      |
//! | [`plan`]      | `Goal`, `Action`, `Leg`, static per-job plans                   |
//! | [`job`]       | `JobRoutine` — seek, travel, act, repeat                        |
//! | [`rest`]      | `RestRoutine` — sleep at night, eat or starve in the morning    |
//! | [`priest`]    | `PriestRoutine`, `CaptiveRoutine`                               |
//! | [`worker`]    | `Worker`, `Routine`, `Flow`, `Activity`                         |
//! | [`scheduler`] | `TaskScheduler`, `Command`                                      |
//! | [`error`]     | `TaskError`, `TaskResult<T>`                                    |
//!
//! # Design notes
//!
//! A routine is an explicit state machine, resumed once per tick.  Each call
//! to a routine's `step` performs one synchronous transition and returns a
//! [`Flow`]: `Continue` runs the next transition in the same tick, `Yield`
//! ends the agent's turn.  The scheduler caps the number of transitions per
//! tick so a routine that never yields cannot stall the simulation.
//!
//! Routines mutate their own agent directly through [`TaskContext`].
//! Anything touching another agent or the grid (demolition, births, deaths,
//! captures) is returned as an [`Effect`] and applied by the host before the
//! next agent steps.

pub mod config;
pub mod context;
pub mod effect;
pub mod error;
pub mod job;
pub mod motion;
pub mod plan;
pub mod priest;
pub mod rest;
pub mod scheduler;
pub mod worker;

#[cfg(test)]
mod tests;

pub use config::TaskConfig;
pub use context::TaskContext;
pub use effect::Effect;
pub use error::{TaskError, TaskResult};
pub use job::{JobRoutine, LegPhase};
pub use motion::{Acting, Body, MoveStatus, Motion, Presentation};
pub use plan::{Action, Goal, Leg, plan_for};
pub use priest::{CaptivePhase, CaptiveRoutine, PriestPhase, PriestRoutine};
pub use rest::{RestFlow, RestPhase, RestRoutine};
pub use scheduler::{Command, TaskScheduler};
pub use worker::{Activity, Flow, Routine, Worker};
