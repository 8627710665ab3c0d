//! Grid and world coordinate types.
//!
//! `GridCoord` addresses a cell (`x` = column, `y` = row).  `WorldPos` is the
//! continuous position of an agent or object; `y` is height and the ground
//! plane is `x`/`z`, so a grid cell `(x, y)` maps onto world `(x, _, z)`.

use std::fmt;

// ── GridCoord ─────────────────────────────────────────────────────────────────

/// Integer cell coordinate.  May be out of range for a particular grid; use
/// `GridMap::is_valid` to check.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell shifted by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Straight-line distance between cell indices, in cells.
    #[inline]
    pub fn distance(self, other: GridCoord) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Chebyshev distance: `<= 1` means the cells touch (or are equal).
    #[inline]
    pub fn chebyshev(self, other: GridCoord) -> i32 {
        (other.x - self.x).abs().max((other.y - self.y).abs())
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ── WorldPos ──────────────────────────────────────────────────────────────────

/// A continuous world-space position.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub const ZERO: WorldPos = WorldPos { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance projected onto the ground plane (height ignored).
    #[inline]
    pub fn ground_distance(self, other: WorldPos) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Ground-plane vector `other - self` as `(dx, dz)`.
    #[inline]
    pub fn ground_delta(self, other: WorldPos) -> (f32, f32) {
        (other.x - self.x, other.z - self.z)
    }

    /// Move at most `max_step` along the ground plane towards `target`.
    ///
    /// Returns the new position and the unused part of `max_step` (non-zero
    /// only when `target` was reached).  Height snaps to the target's.
    pub fn step_towards(self, target: WorldPos, max_step: f32) -> (WorldPos, f32) {
        let dist = self.ground_distance(target);
        if dist <= max_step {
            return (target, max_step - dist);
        }
        let t = max_step / dist;
        let moved = WorldPos {
            x: self.x + (target.x - self.x) * t,
            y: target.y,
            z: self.z + (target.z - self.z) * t,
        };
        (moved, 0.0)
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
