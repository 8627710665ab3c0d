//! Occupancy grid and world↔grid coordinate conversion.
//!
//! # Data layout
//!
//! Cells are stored row-major in one `Vec<Cell>`: cell `(x, y)` lives at
//! `cells[y * width + x]`.  Dimensions are fixed at construction, so every
//! index produced by [`GridMap::index`] is always in range.
//!
//! # Mutation
//!
//! Only the building-registration hook writes cells (via
//! [`GridMap::set_occupancy`]).  Writes take effect immediately for every
//! later search; the simulation never mutates the grid while a search is
//! running.

use hm_core::{GridCoord, WorldPos};

use crate::{GridError, GridResult};

/// Orthogonal neighbour offsets followed by diagonals.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

// ── Cell ──────────────────────────────────────────────────────────────────────

/// Occupancy flags of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub walkable:  bool,
    pub road:      bool,
    pub buildable: bool,
}

impl Cell {
    /// An empty, unoccupied cell.
    pub const OPEN: Cell = Cell { walkable: true, road: false, buildable: true };
}

impl Default for Cell {
    fn default() -> Self {
        Cell::OPEN
    }
}

// ── Footprint ─────────────────────────────────────────────────────────────────

/// A rectangle of cells anchored at its bottom-left `origin`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub origin: GridCoord,
    pub width:  i32,
    pub height: i32,
}

impl Footprint {
    pub const fn new(origin: GridCoord, width: i32, height: i32) -> Self {
        Self { origin, width, height }
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= self.origin.x
            && c.y >= self.origin.y
            && c.x < self.origin.x + self.width
            && c.y < self.origin.y + self.height
    }

    /// Every covered cell, row by row.
    pub fn cells(self) -> impl Iterator<Item = GridCoord> {
        let Footprint { origin, width, height } = self;
        (0..height.max(0)).flat_map(move |dy| (0..width.max(0)).map(move |dx| origin.offset(dx, dy)))
    }

    /// `true` for a zero-area footprint (e.g. a building flattened by a strike).
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

// ── GridMap ───────────────────────────────────────────────────────────────────

/// The settlement's occupancy grid: the single source of truth for which cells
/// agents may walk on and where buildings may go.
#[derive(Clone, Debug)]
pub struct GridMap {
    width:  i32,
    height: i32,
    cells:  Vec<Cell>,

    /// World position of the grid's `(0, 0)` corner.
    pub origin: WorldPos,

    /// World units per cell edge.
    pub scale: f32,
}

impl GridMap {
    /// An all-open grid of `width × height` cells.
    pub fn new(width: i32, height: i32, origin: WorldPos, scale: f32) -> GridResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::OPEN; (width * height) as usize],
            origin,
            scale,
        })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    // ── Coordinate conversion ─────────────────────────────────────────────

    /// Cell containing `pos`: floor of the offset from `origin` over `scale`.
    pub fn grid_coord(&self, pos: WorldPos) -> GridCoord {
        GridCoord::new(
            ((pos.x - self.origin.x) / self.scale).floor() as i32,
            ((pos.z - self.origin.z) / self.scale).floor() as i32,
        )
    }

    /// World position of a cell's corner, or of its centre when `centered`.
    pub fn world_pos(&self, c: GridCoord, height_offset: f32, centered: bool) -> WorldPos {
        let half = if centered { 0.5 } else { 0.0 };
        WorldPos::new(
            self.origin.x + (c.x as f32 + half) * self.scale,
            self.origin.y + height_offset,
            self.origin.z + (c.y as f32 + half) * self.scale,
        )
    }

    /// Centre of a cell at ground height.
    #[inline]
    pub fn center(&self, c: GridCoord) -> WorldPos {
        self.world_pos(c, 0.0, true)
    }

    /// Centre of a footprint at ground height.
    pub fn footprint_center(&self, footprint: Footprint) -> WorldPos {
        let corner = self.world_pos(footprint.origin, 0.0, false);
        WorldPos::new(
            corner.x + footprint.width as f32 * self.scale * 0.5,
            corner.y,
            corner.z + footprint.height as f32 * self.scale * 0.5,
        )
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn is_valid(&self, c: GridCoord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    /// Row-major index of `c`, or `None` when out of range.
    #[inline]
    pub fn index(&self, c: GridCoord) -> Option<usize> {
        self.is_valid(c).then(|| (c.y * self.width + c.x) as usize)
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn coord(&self, index: usize) -> GridCoord {
        GridCoord::new(index as i32 % self.width, index as i32 / self.width)
    }

    pub fn cell(&self, c: GridCoord) -> Option<&Cell> {
        self.index(c).map(|i| &self.cells[i])
    }

    /// `false` for out-of-range cells; bounds-check first to tell "outside"
    /// from "blocked".
    #[inline]
    pub fn is_walkable(&self, c: GridCoord) -> bool {
        self.cell(c).is_some_and(|cell| cell.walkable)
    }

    #[inline]
    pub fn is_road(&self, c: GridCoord) -> bool {
        self.cell(c).is_some_and(|cell| cell.road)
    }

    #[inline]
    pub fn is_buildable(&self, c: GridCoord) -> bool {
        self.cell(c).is_some_and(|cell| cell.buildable)
    }

    /// Overwrite the flags of one cell.
    pub fn set_occupancy(
        &mut self,
        c:         GridCoord,
        walkable:  bool,
        buildable: bool,
        road:      bool,
    ) -> GridResult<()> {
        let i = self.index(c).ok_or(GridError::OutOfRange(c))?;
        self.cells[i] = Cell { walkable, road, buildable };
        Ok(())
    }

    /// `true` iff every cell of `footprint` is in range and buildable, and no
    /// coordinate in `occupants` falls inside it.
    ///
    /// Pass the cells of all awake agents as `occupants` when the building to
    /// be placed is not walkable; pass `&[]` otherwise.
    pub fn can_place(&self, footprint: Footprint, occupants: &[GridCoord]) -> bool {
        !footprint.is_empty()
            && footprint.cells().all(|c| self.is_buildable(c))
            && !occupants.iter().any(|&c| footprint.contains(c))
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Walkable 8-connected neighbours of `c` with their step length
    /// (1 orthogonal, √2 diagonal).
    ///
    /// A diagonal step is only offered when both orthogonal corner cells are
    /// walkable too, so agents never squeeze between two touching walls.
    pub fn neighbors(&self, c: GridCoord) -> impl Iterator<Item = (GridCoord, f32)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let next = c.offset(dx, dy);
            if !self.is_walkable(next) {
                return None;
            }
            if dx != 0 && dy != 0 {
                let corners_open = self.is_walkable(c.offset(dx, 0))
                    && self.is_walkable(c.offset(0, dy));
                corners_open.then_some((next, std::f32::consts::SQRT_2))
            } else {
                Some((next, 1.0))
            }
        })
    }
}
