//! `fl-behavior`: how agents react to each other, to walls and to the
//! pointer.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                         |
//! |---------------|------------------------------------------------------------------|
//! | [`context`]   | `StepContext<'a>`: read-only tick snapshot shared by all agents |
//! | [`neighbors`] | `NeighborAggregator`: average neighbour velocity                |
//! | [`forces`]    | `ForceModel`: acceleration terms and velocity integration       |
//!
//! # Design notes
//!
//! Both kernels are pure functions of one agent's own state plus shared
//! read-only data (a settled grid view and the position / velocity columns).
//! `fl-sim` runs them for every agent in parallel; since each call writes
//! only the state of the agent it was given, there are no cross-agent write
//! races.
//!
//! The aggregator reads the velocity column and the force model writes it,
//! so the two must run in separate phases with a barrier in between.

pub mod context;
pub mod forces;
pub mod neighbors;


pub use context::StepContext;
pub use fl_core::query_reach;
pub use forces::{ForceModel, SteeringInput, SteeringState};
pub use neighbors::NeighborAggregator;
