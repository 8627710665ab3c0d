//! Grid-subsystem error type.

use thiserror::Error;

use hm_core::GridCoord;

/// Errors produced by `hm-grid`.
///
/// A search towards an unwalkable target is an ordinary "no result" for the
/// simulation; callers that do not care about the reason use `.ok()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell {0} is outside the grid")]
    OutOfRange(GridCoord),

    #[error("target cell {0} is not walkable")]
    TargetNotWalkable(GridCoord),

    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },
}

pub type GridResult<T> = Result<T, GridError>;
