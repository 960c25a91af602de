//! `fl-agent`: Structure-of-Arrays agent storage for the `rust_flock` core.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`state`]       | `NeighborAggregate`, `SpawnRequest`                       |
//! | [`store`]       | `AgentStore` (SoA arrays), `AgentRngs` (per-agent RNG)    |
//! | [`builder`]     | `AgentStoreBuilder` (fluent construction)                 |
//!
//! Every column is indexed by `AgentId::index()`.  Despawned slots stay in
//! the columns (marked dead) and are recycled by the next spawn, so ids are
//! unique among live agents and columns never shift.

pub mod builder;
pub mod state;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use state::{NeighborAggregate, SpawnRequest};
pub use store::{AgentRngs, AgentStore, ColumnsMut};
