//! `fl-sim`: tick orchestrator for the rust_flock simulation core.
//!
//! # Tick pipeline
//!
//! ```text
//! Sim::step(TickInput { dt, pointer, config_changes, spawns, despawns }):
//!   validate input                : reject before touching any state
//!   ⓪ Lifecycle : despawn (grid entry purged), config swaps, spawn
//!   ① Assign    : first grid cell for new agents          (parallel)
//!   ② Move      : position += velocity·dt, migrate cells  (parallel)
//!   ③ Settle    : sort buckets for a fixed read order
//!   ④ Neighbours: alignment aggregate                     (parallel, read-only grid)
//!   ⑤ Forces    : acceleration, velocity renormalized     (parallel, read-only grids)
//! ```
//!
//! Every parallel phase runs on a rayon pool sized from
//! `SimConfig::num_threads` and fully joins before the next one starts.
//!
//! # Collaborators
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`input`]   | `TickInput`, `TickPatch`, `AgentFrame`                   |
//! | [`actions`] | `ActionController`, `ActionGauge`, `PlayerActionConfig`  |
//! | [`spawn`]   | `Spawner`, `SpawnBurst`                                  |
//! | [`observer`]| `SimObserver`, `NoopObserver`                            |
//!
//! # Quick-start
//!
//! ```rust
//! use fl_agent::SpawnRequest;
//! use fl_core::{BehaviorConfig, SimConfig, Vec2};
//! use fl_sim::{SimBuilder, TickInput};
//!
//! let behavior = BehaviorConfig::default().into_handle();
//! let config = SimConfig { num_threads: Some(1), ..SimConfig::default() };
//! let mut sim = SimBuilder::new(config, behavior.clone())
//!     .walled_box(Vec2::new(-20.0, -20.0), Vec2::new(20.0, 20.0))
//!     .spawn(SpawnRequest::new(Vec2::ZERO, 0.0, behavior))
//!     .build()
//!     .unwrap();
//!
//! let stats = sim.step(TickInput::new(0.02, Vec2::new(5.0, 5.0))).unwrap();
//! assert_eq!(stats.live, 1);
//! assert_eq!(sim.frames().len(), 1);
//! ```

pub mod actions;
pub mod builder;
pub mod error;
pub mod input;
pub mod observer;
mod phases;
pub mod sim;
pub mod spawn;


pub use actions::{ActionController, ActionEvent, ActionGauge, ActionKind, PlayerActionConfig};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use fl_agent::SpawnRequest;
pub use input::{AgentFrame, TickInput, TickPatch};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, TickStats};
pub use spawn::{SpawnBurst, Spawner};
