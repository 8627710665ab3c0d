//! `hm-building` — buildings, their registry, and nearest-target search.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`kind`]        | `BuildingTag`, `BuildingKind`, `Field`, `Warehouse`, `House`, `Temple` |
//! | [`building`]    | `Building`, `Construction`, `Side`, interaction cells           |
//! | [`registry`]    | `BuildingRegistry` (slots, cell index, R-tree, grid hook)       |
//! | [`interaction`] | `InteractionIndex::nearest`, `Interactable`                     |
//! | [`error`]       | `BuildingError`, `BuildingResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on plain-data types.       |

pub mod building;
pub mod error;
pub mod interaction;
pub mod kind;
pub mod registry;


pub use building::{Building, Construction, Side};
pub use error::{BuildingError, BuildingResult};
pub use interaction::{Interactable, InteractionIndex};
pub use kind::{BuildingKind, BuildingTag, FIELD_SLOTS, Field, House, Temple, Warehouse};
pub use registry::BuildingRegistry;
