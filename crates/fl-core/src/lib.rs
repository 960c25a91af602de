//! `fl-core`: foundational types for the `rust_flock` simulation core.
//!
//! This crate is a dependency of every other `fl-*` crate.  It intentionally
//! has no `fl-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ObstacleId`                               |
//! | [`math`]        | `Vec2` planar vector                                  |
//! | [`cell`]        | `CellCoord`, floor-based world → cell mapping         |
//! | [`config`]      | `BehaviorConfig`, `ConfigHandle`                      |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `FlockError`, `FlockResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::CellCoord;
pub use config::{BehaviorConfig, ConfigHandle, MAX_QUERY_RADIUS_CELLS, query_reach};
pub use error::{FlockError, FlockResult};
pub use ids::{AgentId, ObstacleId};
pub use math::Vec2;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
