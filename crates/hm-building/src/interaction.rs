//! Nearest reachable interaction cell across all buildings of a kind.

use hm_core::{BuildingId, GridCoord};
use hm_grid::{GridMap, PathFinder, reconstruct_path};

use crate::{Building, BuildingRegistry, BuildingTag};

/// Result of [`InteractionIndex::nearest`].
#[derive(Clone, Debug, PartialEq)]
pub struct Interactable {
    pub building: BuildingId,
    /// The interaction cell the agent should walk to.
    pub cell:     GridCoord,
    /// Realized weighted path cost from the query origin.
    pub distance: f32,
    /// Path to `cell`, origin-exclusive.  Empty when already standing there.
    pub path:     Vec<GridCoord>,
}

/// Read-only view bundling what a nearest-target query needs.
pub struct InteractionIndex<'a, F: PathFinder + ?Sized> {
    grid:     &'a GridMap,
    registry: &'a BuildingRegistry,
    finder:   &'a F,
}

impl<'a, F: PathFinder + ?Sized> InteractionIndex<'a, F> {
    pub fn new(grid: &'a GridMap, registry: &'a BuildingRegistry, finder: &'a F) -> Self {
        Self { grid, registry, finder }
    }

    /// The globally nearest reachable interaction cell of any building that
    /// satisfies `predicate`.
    ///
    /// Runs one search per candidate cell and compares realized distances, so
    /// the answer is the minimum, not whichever cell a multi-target search
    /// would reach first.  Unreachable candidates are skipped.  Ties keep the
    /// candidate seen first (lower building id, then cell order).
    pub fn nearest<P>(&self, origin: GridCoord, predicate: P) -> Option<Interactable>
    where
        P: Fn(&Building) -> bool,
    {
        let mut best: Option<Interactable> = None;
        for building in self.registry.iter().filter(|b| predicate(b)) {
            for cell in building.interaction_cells(self.grid) {
                let Ok(map) = self.finder.search(self.grid, origin, &[cell]) else {
                    continue;
                };
                let Some(distance) = map.distance(cell) else { continue };
                if best.as_ref().is_some_and(|b| b.distance <= distance) {
                    continue;
                }
                let Some(path) = reconstruct_path(&map, origin, cell) else { continue };
                best = Some(Interactable { building: building.id, cell, distance, path });
            }
        }
        best
    }

    /// [`nearest`](Self::nearest) restricted to buildings of one kind.
    pub fn nearest_of<P>(&self, origin: GridCoord, tag: BuildingTag, predicate: P) -> Option<Interactable>
    where
        P: Fn(&Building) -> bool,
    {
        self.nearest(origin, |b| b.tag() == tag && predicate(b))
    }

    /// `true` if `cell` is one of `building`'s current interaction cells.
    pub fn is_interaction_cell(&self, building: BuildingId, cell: GridCoord) -> bool {
        self.registry
            .get(building)
            .is_some_and(|b| b.interaction_cells(self.grid).contains(&cell))
    }
}
