//! Building registry: slot storage, cell index, and footprint R-tree.
//!
//! # Grid hook
//!
//! [`BuildingRegistry::register`] and [`BuildingRegistry::unregister`] are the
//! only code paths that write cell occupancy.  Registration marks the
//! footprint unbuildable, walkable iff the building is, and flags road cells;
//! unregistration resets the footprint to open ground.  Callers that keep
//! paths across a registry mutation must revalidate them.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds each footprint as an axis-aligned box in
//! grid units, for area queries such as "which buildings does this circle
//! touch".

use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use hm_core::{AgentId, BuildingId, GridCoord};
use hm_grid::{Cell, Footprint, GridMap};

use crate::{Building, BuildingError, BuildingResult, BuildingTag};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct FootprintEntry {
    min: [f32; 2],
    max: [f32; 2],
    id:  BuildingId,
}

impl FootprintEntry {
    fn new(id: BuildingId, fp: Footprint) -> Self {
        let min = [fp.origin.x as f32, fp.origin.y as f32];
        Self { min, max: [min[0] + fp.width as f32, min[1] + fp.height as f32], id }
    }
}

impl RTreeObject for FootprintEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

// ── BuildingRegistry ──────────────────────────────────────────────────────────

/// Every building currently standing, addressable by id, cell, kind or area.
///
/// Ids are slot indices and are never reused: a demolished building leaves a
/// `None` slot behind, so stale ids resolve to "gone".
#[derive(Default)]
pub struct BuildingRegistry {
    slots:       Vec<Option<Building>>,
    by_cell:     FxHashMap<GridCoord, BuildingId>,
    spatial_idx: RTree<FootprintEntry>,
    live:        usize,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Place `building` on `grid` and assign it an id.
    ///
    /// Fails with [`BuildingError::NotPlaceable`] if any footprint cell is out
    /// of range or not buildable.  Agent occupancy is the caller's concern.
    pub fn register(&mut self, grid: &mut GridMap, mut building: Building) -> BuildingResult<BuildingId> {
        let fp = building.footprint;
        if !grid.can_place(fp, &[]) {
            return Err(BuildingError::NotPlaceable {
                kind:   building.tag().as_str(),
                origin: fp.origin,
            });
        }
        let id = BuildingId(self.slots.len() as u32);
        let road = building.tag() == BuildingTag::Road;
        for c in fp.cells() {
            grid.set_occupancy(c, building.walkable, false, road)?;
            self.by_cell.insert(c, id);
        }
        self.spatial_idx.insert(FootprintEntry::new(id, fp));

        building.id = id;
        self.slots.push(Some(building));
        self.live += 1;
        Ok(id)
    }

    /// Remove a building and reopen its footprint.  Returns the building so
    /// the caller can act on its final state (evict inhabitants, log it).
    pub fn unregister(&mut self, grid: &mut GridMap, id: BuildingId) -> BuildingResult<Building> {
        let building = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(BuildingError::NotFound(id))?;
        let fp = building.footprint;
        for c in fp.cells() {
            let Cell { walkable, buildable, road } = Cell::OPEN;
            grid.set_occupancy(c, walkable, buildable, road)?;
            self.by_cell.remove(&c);
        }
        self.spatial_idx.remove(&FootprintEntry::new(id, fp));
        self.live -= 1;
        Ok(building)
    }

    /// Advance construction of every unfinished building by `dt` seconds.
    pub fn advance_construction(&mut self, dt: f32) {
        for b in self.slots.iter_mut().flatten() {
            b.construction.advance(dt);
        }
    }

    /// Free any altar `priest` still holds (the priest died mid-sacrifice).
    /// Returns the temple that was released.
    pub fn release_altar(&mut self, priest: AgentId) -> Option<BuildingId> {
        let temple = self
            .slots
            .iter_mut()
            .flatten()
            .filter_map(|b| {
                let id = b.id;
                b.temple_mut().map(|t| (id, t))
            })
            .find(|(_, t)| t.holder() == Some(priest))?;
        let (id, t) = temple;
        t.end_sacrifice();
        Some(id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: BuildingId) -> bool {
        self.get(id).is_some()
    }

    /// The building whose footprint covers `c`, if any.
    pub fn at(&self, c: GridCoord) -> Option<BuildingId> {
        self.by_cell.get(&c).copied()
    }

    /// Number of standing buildings.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Standing buildings in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Building> + '_ {
        self.slots.iter().flatten()
    }

    /// Standing buildings of one kind, in ascending id order.
    pub fn of_kind(&self, tag: BuildingTag) -> impl Iterator<Item = &Building> + '_ {
        self.iter().filter(move |b| b.tag() == tag)
    }

    /// Ids of buildings whose footprint box intersects the square of
    /// half-size `radius` around `center` (grid units, continuous).
    ///
    /// A coarse filter: callers apply their exact shape test afterwards.
    pub fn near(&self, center: [f32; 2], radius: f32) -> Vec<BuildingId> {
        let query = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        let mut ids: Vec<BuildingId> = self
            .spatial_idx
            .locate_in_envelope_intersecting(&query)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
