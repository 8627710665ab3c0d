//! A placed building: kind, footprint, construction state, and the cells
//! agents use to interact with it.

use hm_core::{BuildingId, GridCoord};
use hm_grid::{Footprint, GridMap};

use crate::kind::{BuildingKind, BuildingTag, Field, House, Temple, Warehouse};

/// Fraction of the remaining progress per (second / wood unit).
const BUILD_RATE: f32 = 0.2;

// ── Construction ──────────────────────────────────────────────────────────────

/// Wood delivery and build progress.
///
/// Progress can never run ahead of the delivered share of wood:
/// `progress <= wood_provided / wood_required`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Construction {
    pub wood_required: u32,
    pub wood_provided: u32,
    progress:          f32,
}

impl Construction {
    pub fn new(wood_required: u32) -> Self {
        Self {
            wood_required,
            wood_provided: 0,
            progress: if wood_required == 0 { 1.0 } else { 0.0 },
        }
    }

    /// Already built; needs nothing.
    pub fn finished() -> Self {
        Self::new(0)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn requires_wood(&self) -> bool {
        self.wood_provided < self.wood_required
    }

    /// Accept one unit of wood.  `false` if nothing more is needed.
    pub fn provide_wood(&mut self) -> bool {
        if !self.requires_wood() {
            return false;
        }
        self.wood_provided += 1;
        true
    }

    /// Advance progress by `dt` seconds of building time.
    pub fn advance(&mut self, dt: f32) {
        if self.is_finished() || self.wood_required == 0 {
            return;
        }
        let required = self.wood_required as f32;
        let cap = self.wood_provided as f32 / required;
        self.progress = (self.progress + dt / required * BUILD_RATE).min(cap);
    }
}

impl Default for Construction {
    fn default() -> Self {
        Self::finished()
    }
}

// ── Side ──────────────────────────────────────────────────────────────────────

/// One side of a footprint.  `North` faces increasing `y`, `East` increasing `x`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    North,
    South,
    East,
    West,
}

// ── Building ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Building {
    /// Assigned by the registry on registration; `INVALID` before that.
    pub id:           BuildingId,
    pub kind:         BuildingKind,
    pub footprint:    Footprint,
    pub walkable:     bool,
    /// Restricts the interaction ring to one side of a non-walkable building.
    pub side:         Option<Side>,
    pub construction: Construction,
}

impl Building {
    /// A finished building of `kind` at `origin` with the kind's default
    /// footprint and walkability.
    pub fn new(kind: BuildingKind, origin: GridCoord) -> Self {
        let tag = kind.tag();
        let (w, h) = tag.default_size();
        Self {
            id: BuildingId::INVALID,
            kind,
            footprint: Footprint::new(origin, w, h),
            walkable: tag.is_walkable(),
            side: None,
            construction: Construction::finished(),
        }
    }

    /// Shorthand for `Building::new(BuildingKind::from_tag(tag), origin)`.
    pub fn of(tag: BuildingTag, origin: GridCoord) -> Self {
        Self::new(BuildingKind::from_tag(tag), origin)
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.footprint = Footprint::new(self.footprint.origin, width, height);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Start unbuilt, waiting for `wood` deliveries.
    pub fn under_construction(mut self, wood: u32) -> Self {
        self.construction = Construction::new(wood);
        self
    }

    #[inline]
    pub fn tag(&self) -> BuildingTag {
        self.kind.tag()
    }

    pub fn is_finished(&self) -> bool {
        self.construction.is_finished()
    }

    // ── Kind accessors ────────────────────────────────────────────────────

    pub fn field(&self) -> Option<&Field> {
        match &self.kind {
            BuildingKind::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn field_mut(&mut self) -> Option<&mut Field> {
        match &mut self.kind {
            BuildingKind::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn warehouse(&self) -> Option<&Warehouse> {
        match &self.kind {
            BuildingKind::Warehouse(w) => Some(w),
            _ => None,
        }
    }

    pub fn warehouse_mut(&mut self) -> Option<&mut Warehouse> {
        match &mut self.kind {
            BuildingKind::Warehouse(w) => Some(w),
            _ => None,
        }
    }

    pub fn house(&self) -> Option<&House> {
        match &self.kind {
            BuildingKind::House(h) => Some(h),
            _ => None,
        }
    }

    pub fn house_mut(&mut self) -> Option<&mut House> {
        match &mut self.kind {
            BuildingKind::House(h) => Some(h),
            _ => None,
        }
    }

    pub fn temple(&self) -> Option<&Temple> {
        match &self.kind {
            BuildingKind::Temple(t) => Some(t),
            _ => None,
        }
    }

    pub fn temple_mut(&mut self) -> Option<&mut Temple> {
        match &mut self.kind {
            BuildingKind::Temple(t) => Some(t),
            _ => None,
        }
    }

    /// A finished temple with a free altar.
    pub fn can_sacrifice(&self) -> bool {
        matches!(&self.kind, BuildingKind::Temple(t) if !t.is_sacrificing()) && self.is_finished()
    }

    // ── Interaction cells ─────────────────────────────────────────────────

    /// Cells from which an agent can act on this building.
    ///
    /// A walkable building is entered: every footprint cell qualifies.
    /// Otherwise the orthogonal ring around the footprint is used, narrowed to
    /// [`side`](Self::side) when one is set, and filtered to in-range
    /// walkable cells.
    pub fn interaction_cells(&self, grid: &GridMap) -> Vec<GridCoord> {
        if self.walkable {
            return self.footprint.cells().filter(|&c| grid.is_valid(c)).collect();
        }
        let Footprint { origin, width, height } = self.footprint;
        let mut ring = Vec::with_capacity(2 * (width + height).max(0) as usize);
        let wants = |side: Side| self.side.is_none_or(|s| s == side);

        if wants(Side::South) {
            ring.extend((0..width).map(|dx| origin.offset(dx, -1)));
        }
        if wants(Side::North) {
            ring.extend((0..width).map(|dx| origin.offset(dx, height)));
        }
        if wants(Side::West) {
            ring.extend((0..height).map(|dy| origin.offset(-1, dy)));
        }
        if wants(Side::East) {
            ring.extend((0..height).map(|dy| origin.offset(width, dy)));
        }
        ring.retain(|&c| grid.is_walkable(c));
        ring
    }
}
