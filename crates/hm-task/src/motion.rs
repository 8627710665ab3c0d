//! Per-agent movement along a cell path and timed acts.

use hm_core::{AgentId, GridCoord, ResourceKind, WorldPos};
use hm_grid::GridMap;

use crate::TaskContext;

/// Remaining act time at or below this counts as done.
const ACT_EPSILON: f32 = 1e-4;

// ── Motion ────────────────────────────────────────────────────────────────────

/// Outcome of one tick of [`Motion::advance`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MoveStatus {
    /// Budget used up before the last waypoint.
    Moving,
    /// Standing on the last waypoint (or there was nothing to walk).
    Arrived,
    /// The path was invalidated; the owner must search again.
    Aborted,
}

/// The path an agent is currently following.
///
/// `path` is origin-exclusive; `cursor` indexes the next waypoint.  An abort
/// drops the path and raises `aborted` until the next [`start`](Self::start).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Motion {
    pub target:  Option<GridCoord>,
    pub path:    Option<Vec<GridCoord>>,
    pub cursor:  usize,
    pub aborted: bool,
}

impl Motion {
    pub fn start(&mut self, target: GridCoord, path: Vec<GridCoord>) {
        self.target = Some(target);
        self.path = Some(path);
        self.cursor = 0;
        self.aborted = false;
    }

    pub fn clear(&mut self) {
        *self = Motion::default();
    }

    pub fn abort(&mut self) {
        self.path = None;
        self.cursor = 0;
        self.aborted = true;
    }

    #[inline]
    pub fn is_travelling(&self) -> bool {
        self.path.is_some()
    }

    /// Waypoints not yet reached.
    pub fn remaining(&self) -> &[GridCoord] {
        match &self.path {
            Some(path) => &path[self.cursor.min(path.len())..],
            None => &[],
        }
    }

    /// `true` if any waypoint ahead is no longer walkable.
    pub fn is_blocked(&self, grid: &GridMap) -> bool {
        self.remaining().iter().any(|&c| !grid.is_walkable(c))
    }

    /// Walk up to `budget` world units along the path, carrying leftover
    /// distance across waypoints.
    pub fn advance(&mut self, pos: &mut WorldPos, grid: &GridMap, mut budget: f32) -> MoveStatus {
        if self.aborted {
            return MoveStatus::Aborted;
        }
        let Some(path) = &self.path else {
            return MoveStatus::Arrived;
        };
        while let Some(&cell) = path.get(self.cursor) {
            let waypoint = grid.center(cell);
            let dist = pos.ground_distance(waypoint);
            if dist > budget {
                *pos = pos.step_towards(waypoint, budget).0;
                return MoveStatus::Moving;
            }
            *pos = waypoint;
            budget -= dist;
            self.cursor += 1;
        }
        self.path = None;
        self.cursor = 0;
        MoveStatus::Arrived
    }
}

// ── Acting ────────────────────────────────────────────────────────────────────

/// A timed act in progress (harvesting, felling, eating, ...).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Acting {
    pub remaining: f32,
    /// Animation strength, `0..=1`.
    pub intensity: f32,
    /// What the agent faces while acting.
    pub focus:     WorldPos,
}

impl Acting {
    pub fn new(duration: f32, intensity: f32, focus: WorldPos) -> Self {
        Self { remaining: duration, intensity, focus }
    }

    /// Spend one tick.  `true` while the act is still running.
    pub fn proceed(&mut self, dt: f32) -> bool {
        if self.remaining > ACT_EPSILON {
            self.remaining -= dt;
            true
        } else {
            false
        }
    }
}

// ── Presentation ──────────────────────────────────────────────────────────────

/// Read-only view of an agent for the host's renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Presentation {
    pub acting:    bool,
    pub intensity: f32,
    pub holding:   Option<ResourceKind>,
    /// Unit ground-plane heading `(dx, dz)`.
    pub facing:    (f32, f32),
    /// World units per second over the last tick, `(dx, dz)`.
    pub velocity:  (f32, f32),
    /// `false` while asleep indoors.
    pub visible:   bool,
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Movement and act state shared by every routine a worker runs.
#[derive(Clone, Debug, Default)]
pub struct Body {
    pub motion:       Motion,
    pub acting:       Option<Acting>,
    pub presentation: Presentation,
}

impl Body {
    /// Move `agent` along its path for one tick.
    ///
    /// Speed is `velocity`, scaled up by the road discount on a road cell and
    /// down while hungry.
    pub fn travel(&mut self, agent: AgentId, ctx: &mut TaskContext<'_>) -> MoveStatus {
        let i = agent.index();
        let mut pos = ctx.agents.position[i];
        let mut speed = ctx.config.velocity;
        if ctx.grid.is_road(ctx.grid.grid_coord(pos)) {
            speed *= ctx.config.road_discount;
        }
        if ctx.agents.status[i].hungry {
            speed *= ctx.config.hungry_speed_factor;
        }
        let status = self.motion.advance(&mut pos, ctx.grid, speed * ctx.dt);
        ctx.agents.position[i] = pos;
        status
    }

    /// Run (or keep running) an act of `duration` seconds.
    ///
    /// `true` while the act is in progress: the caller yields.  `false` once
    /// it has completed, after which the act is cleared.  A zero duration
    /// completes without yielding.
    pub fn act(&mut self, dt: f32, duration: f32, intensity: f32, focus: WorldPos) -> bool {
        let acting = self
            .acting
            .get_or_insert_with(|| Acting::new(duration, intensity, focus));
        if acting.proceed(dt) {
            return true;
        }
        self.acting = None;
        false
    }

    /// Refresh the presentation after a step that moved from `before` to
    /// `after` in `dt` seconds.
    pub fn present(
        &mut self,
        before:   WorldPos,
        after:    WorldPos,
        dt:       f32,
        holding:  Option<ResourceKind>,
        sleeping: bool,
    ) {
        let (dx, dz) = before.ground_delta(after);
        let p = &mut self.presentation;
        p.velocity = if dt > 0.0 { (dx / dt, dz / dt) } else { (0.0, 0.0) };
        if let Some(heading) = unit(dx, dz) {
            p.facing = heading;
        } else if let Some(act) = &self.acting {
            let (fx, fz) = after.ground_delta(act.focus);
            if let Some(heading) = unit(fx, fz) {
                p.facing = heading;
            }
        }
        p.acting = self.acting.is_some();
        p.intensity = self.acting.map_or(0.0, |a| a.intensity);
        p.holding = holding;
        p.visible = !sleeping;
    }
}

fn unit(dx: f32, dz: f32) -> Option<(f32, f32)> {
    let len = (dx * dx + dz * dz).sqrt();
    (len > f32::EPSILON).then(|| (dx / len, dz / len))
}
