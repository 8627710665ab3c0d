//! Building-subsystem error type.

use thiserror::Error;

use hm_core::{BuildingId, CoreError, GridCoord};
use hm_grid::GridError;

#[derive(Debug, Error)]
pub enum BuildingError {
    #[error("cannot place a {kind} at {origin}: footprint is blocked or out of range")]
    NotPlaceable { kind: &'static str, origin: GridCoord },

    #[error("building {0} not found")]
    NotFound(BuildingId),

    #[error("building {id} is not a {expected}")]
    WrongKind { id: BuildingId, expected: &'static str },

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

pub type BuildingResult<T> = Result<T, BuildingError>;
