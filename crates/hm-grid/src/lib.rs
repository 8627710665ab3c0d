//! `hm-grid` — occupancy grid and path search.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                       |
//! |-----------|----------------------------------------------------------------|
//! | [`grid`]  | `Cell`, `Footprint`, `GridMap` (occupancy + coordinates)       |
//! | [`path`]  | `PathFinder` trait, `AStarFinder`, `NodeMap`, `reconstruct_path` |
//! | [`error`] | `GridError`, `GridResult<T>`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod grid;
pub mod path;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use grid::{Cell, Footprint, GridMap};
pub use path::{AStarFinder, NodeMap, PathFinder, PathNode, path_cost, reconstruct_path, smooth};
