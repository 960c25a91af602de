//! `fl-mobility`: moving agents and keeping the partition grid in step.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`integrate`]   | `integrate_position`: explicit Euler position step        |
//! | [`partition`]   | `PartitionTracker`, `Migration`                            |
//!
//! # Movement model
//!
//! 1. `integrate_position` advances `position += velocity * dt` using the
//!    velocity produced by the previous tick's force step.
//! 2. `PartitionTracker::refresh` recomputes the agent's cell from the new
//!    position and, if it changed, moves the agent's grid entry.
//!
//! Both are per-agent kernels with no shared mutable state apart from the
//! grid, whose buckets tolerate concurrent writers, so `fl-sim` runs them
//! for all agents in parallel.

pub mod integrate;
pub mod partition;


pub use integrate::integrate_position;
pub use partition::{Migration, PartitionTracker};
