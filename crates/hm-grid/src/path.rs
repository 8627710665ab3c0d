//! Path-search trait and the default weighted A* implementation.
//!
//! # Pluggability
//!
//! The task scheduler calls searches through the [`PathFinder`] trait, so a
//! host can swap in another strategy (jump-point search, cached flow fields)
//! without touching job routines.  The default [`AStarFinder`] covers the
//! settlement's needs.
//!
//! # Cost model
//!
//! Stepping from cell `a` to an 8-connected neighbour `b` costs the Euclidean
//! step length (1 or √2), divided by `road_discount` when `a`, the cell
//! being departed, is a road.  Only the departure cell counts, so crossing a
//! road/non-road boundary costs differently in each direction.
//!
//! # Multi-target searches
//!
//! [`PathFinder::search`] accepts several targets and stops as soon as the
//! first of them is popped from the frontier.  It answers "was some target
//! reached, and how", not "which target is nearest"; the interaction index
//! runs one search per candidate when it must name the nearest.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hm_core::GridCoord;

use crate::{GridError, GridMap, GridResult};

// ── NodeMap ───────────────────────────────────────────────────────────────────

/// Search scratch data for one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathNode {
    /// Cell this one was reached from.  The origin is its own parent.
    pub parent: GridCoord,
    /// Weighted cost of the best path from the origin.
    pub distance_from_origin: f32,
    /// `true` once the cell was popped and settled.
    pub visited: bool,
}

impl Default for PathNode {
    fn default() -> Self {
        Self {
            parent:               GridCoord::default(),
            distance_from_origin: f32::INFINITY,
            visited:              false,
        }
    }
}

/// Result of a search: one [`PathNode`] per grid cell, with only settled
/// cells marked visited.  Owned by the caller; never shared between searches.
#[derive(Clone, Debug)]
pub struct NodeMap {
    width:  i32,
    height: i32,
    nodes:  Vec<PathNode>,
}

impl NodeMap {
    /// An all-unvisited map matching `grid`'s dimensions.
    pub fn unvisited(grid: &GridMap) -> Self {
        Self {
            width:  grid.width(),
            height: grid.height(),
            nodes:  vec![PathNode::default(); grid.cell_count()],
        }
    }

    #[inline]
    fn index(&self, c: GridCoord) -> Option<usize> {
        (c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height)
            .then(|| (c.y * self.width + c.x) as usize)
    }

    pub fn get(&self, c: GridCoord) -> Option<&PathNode> {
        self.index(c).map(|i| &self.nodes[i])
    }

    pub fn is_visited(&self, c: GridCoord) -> bool {
        self.get(c).is_some_and(|n| n.visited)
    }

    /// Realized weighted distance to `c`, if the search settled it.
    pub fn distance(&self, c: GridCoord) -> Option<f32> {
        self.get(c).filter(|n| n.visited).map(|n| n.distance_from_origin)
    }

    /// Number of settled cells.  A rough measure of search effort.
    pub fn visited_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.visited).count()
    }

    /// The settled cells among `targets`, in the order given.
    pub fn reached<'a>(&'a self, targets: &'a [GridCoord]) -> impl Iterator<Item = GridCoord> + 'a {
        targets.iter().copied().filter(|&t| self.is_visited(t))
    }
}

// ── Frontier ──────────────────────────────────────────────────────────────────

/// A pending frontier entry, ordered so that `BinaryHeap` pops the lowest
/// `estimated_total` first.  Ties pop the smaller coordinate (`x`, then `y`)
/// first, which keeps searches deterministic.
#[derive(Copy, Clone, Debug)]
struct SearchFrontierEntry {
    coord:                GridCoord,
    parent:               GridCoord,
    distance_from_origin: f32,
    estimated_total:      f32,
}

impl PartialEq for SearchFrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchFrontierEntry {}

impl PartialOrd for SearchFrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchFrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimated_total
            .total_cmp(&self.estimated_total)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path search over a [`GridMap`].
pub trait PathFinder {
    /// Search from `origin` until any cell of `targets` is settled.
    ///
    /// Returns `Err(TargetNotWalkable)` if any target is blocked or out of
    /// range; the search never routes to a substitute cell.  An empty
    /// `targets` slice yields an all-unvisited map.  The origin itself may be
    /// unwalkable (an agent standing where a building was just placed can
    /// still walk out).
    fn search(&self, grid: &GridMap, origin: GridCoord, targets: &[GridCoord]) -> GridResult<NodeMap>;

    /// Divisor applied to steps departing a road cell.
    fn road_discount(&self) -> f32;

    /// Convenience: single-target search followed by reconstruction.
    ///
    /// `None` when the target is blocked or unreachable.
    fn path(&self, grid: &GridMap, origin: GridCoord, target: GridCoord) -> Option<Vec<GridCoord>> {
        let map = self.search(grid, origin, &[target]).ok()?;
        reconstruct_path(&map, origin, target).map(smooth)
    }
}

// ── AStarFinder ───────────────────────────────────────────────────────────────

/// Weighted A* over the 8-connected grid.
///
/// The heuristic is the straight-line distance to the closest target divided
/// by `road_discount`, applied unconditionally.  For `road_discount >= 1` it
/// never exceeds the true remaining cost.
#[derive(Copy, Clone, Debug)]
pub struct AStarFinder {
    pub road_discount: f32,
}

impl AStarFinder {
    pub fn new(road_discount: f32) -> Self {
        debug_assert!(road_discount >= 1.0, "road discount below 1 turns roads into a penalty");
        Self { road_discount }
    }

    fn heuristic(&self, c: GridCoord, targets: &[GridCoord]) -> f32 {
        targets
            .iter()
            .map(|&t| c.distance(t))
            .fold(f32::INFINITY, f32::min)
            / self.road_discount
    }
}

impl Default for AStarFinder {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl PathFinder for AStarFinder {
    fn search(&self, grid: &GridMap, origin: GridCoord, targets: &[GridCoord]) -> GridResult<NodeMap> {
        let mut map = NodeMap::unvisited(grid);
        if targets.is_empty() {
            return Ok(map);
        }
        let origin_idx = grid.index(origin).ok_or(GridError::OutOfRange(origin))?;

        let mut is_target = vec![false; grid.cell_count()];
        for &t in targets {
            match grid.index(t) {
                Some(i) if grid.is_walkable(t) => is_target[i] = true,
                _ => return Err(GridError::TargetNotWalkable(t)),
            }
        }

        // best[i] = cheapest distance pushed so far; prunes obviously worse
        // duplicates.  Stale entries that still get through are skipped on pop.
        let mut best = vec![f32::INFINITY; grid.cell_count()];
        best[origin_idx] = 0.0;

        let mut frontier = BinaryHeap::new();
        frontier.push(SearchFrontierEntry {
            coord:                origin,
            parent:               origin,
            distance_from_origin: 0.0,
            estimated_total:      self.heuristic(origin, targets),
        });

        while let Some(entry) = frontier.pop() {
            let Some(idx) = grid.index(entry.coord) else { continue };
            let node = &mut map.nodes[idx];
            if node.visited {
                continue;
            }
            *node = PathNode {
                parent:               entry.parent,
                distance_from_origin: entry.distance_from_origin,
                visited:              true,
            };
            if is_target[idx] {
                break;
            }

            let departure = if grid.is_road(entry.coord) { self.road_discount } else { 1.0 };
            for (next, step) in grid.neighbors(entry.coord) {
                let Some(next_idx) = grid.index(next) else { continue };
                if map.nodes[next_idx].visited {
                    continue;
                }
                let distance = entry.distance_from_origin + step / departure;
                if distance < best[next_idx] {
                    best[next_idx] = distance;
                    frontier.push(SearchFrontierEntry {
                        coord:                next,
                        parent:               entry.coord,
                        distance_from_origin: distance,
                        estimated_total:      distance + self.heuristic(next, targets),
                    });
                }
            }
        }

        Ok(map)
    }

    fn road_discount(&self) -> f32 {
        self.road_discount
    }
}

// ── Path reconstruction ───────────────────────────────────────────────────────

/// Walk `parent` links from `target` back to `origin`.
///
/// The returned cells exclude `origin` and end with `target`; an empty `Vec`
/// means the agent is already there.  `None` if `target` was never settled.
/// Reconstruction is read-only, so calling it twice yields the same path.
pub fn reconstruct_path(map: &NodeMap, origin: GridCoord, target: GridCoord) -> Option<Vec<GridCoord>> {
    if !map.is_visited(target) {
        return None;
    }
    let mut path = Vec::new();
    let mut cur = target;
    while cur != origin {
        path.push(cur);
        let node = map.get(cur)?;
        // A settled non-origin cell always has a distinct, settled parent.
        if !node.visited || node.parent == cur {
            return None;
        }
        cur = node.parent;
    }
    path.reverse();
    Some(path)
}

/// Path post-processing hook.  Currently the identity: no geometric
/// simplification is performed.
#[inline]
pub fn smooth(path: Vec<GridCoord>) -> Vec<GridCoord> {
    path
}

/// Weighted cost of walking `path` starting at `origin`, using the same cost
/// model as the search.
pub fn path_cost(grid: &GridMap, origin: GridCoord, path: &[GridCoord], road_discount: f32) -> f32 {
    let mut prev = origin;
    let mut total = 0.0;
    for &c in path {
        let departure = if grid.is_road(prev) { road_discount } else { 1.0 };
        total += prev.distance(c) / departure;
        prev = c;
    }
    total
}
