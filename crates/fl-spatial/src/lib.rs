//! `fl-spatial`: uniform partition grids and static obstacles.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`grid`]       | `SpatialGrid` (sharded, concurrent writers), `GridView`, `FrozenGrid` |
//! | [`obstacle`]   | `ObstacleSegment`, `ObstacleMap`, `ObstacleMapBuilder`      |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Read/write discipline
//!
//! A [`SpatialGrid`] accepts inserts and removes through `&self` from any
//! number of threads.  Reading goes through a [`GridView`], which can only be
//! obtained from `&mut SpatialGrid`: holding a view statically guarantees no
//! writer is active, so queries take no locks and the view can be shared
//! across every worker of a read-only phase.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `ObstacleSegment`.      |

pub mod error;
pub mod grid;
pub mod obstacle;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::{FrozenGrid, GridView, SpatialGrid, DEFAULT_SHARD_COUNT};
pub use obstacle::{ObstacleMap, ObstacleMapBuilder, ObstacleSegment};
