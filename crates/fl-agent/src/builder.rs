//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use fl_agent::{AgentStoreBuilder, SpawnRequest};
//! use fl_core::{BehaviorConfig, Vec2};
//!
//! let config = BehaviorConfig::default().into_handle();
//! let (store, rngs) = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .spawn(SpawnRequest::new(Vec2::new(0.0, 0.0), 0.0, config.clone()))
//!     .spawn(SpawnRequest::new(Vec2::new(1.0, 0.0), 1.5, config))
//!     .build();
//!
//! assert_eq!(store.live_count(), 2);
//! assert_eq!(rngs.len(), 2);
//! ```

use crate::{AgentRngs, AgentStore, SpawnRequest};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// Columns are pre-allocated for the queued spawns plus any extra
/// [`capacity`](Self::capacity) so later spawns do not reallocate.
pub struct AgentStoreBuilder {
    seed:     u64,
    capacity: usize,
    spawns:   Vec<SpawnRequest>,
}

impl AgentStoreBuilder {
    /// Create a builder using `seed` as the global RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, capacity: 0, spawns: Vec::new() }
    }

    /// Reserve room for at least `capacity` agents.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Queue one initial agent.
    pub fn spawn(mut self, req: SpawnRequest) -> Self {
        self.spawns.push(req);
        self
    }

    /// Queue many initial agents.
    pub fn spawn_all(mut self, reqs: impl IntoIterator<Item = SpawnRequest>) -> Self {
        self.spawns.extend(reqs);
        self
    }

    /// Construct `AgentStore` and `AgentRngs` with every queued agent
    /// spawned in order, so the n-th request gets `AgentId(n)`.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let mut store = AgentStore::with_capacity(self.capacity.max(self.spawns.len()));
        let mut rngs = AgentRngs::new(self.seed);
        for req in self.spawns {
            let agent = store.spawn(req);
            rngs.reseed(agent);
        }
        (store, rngs)
    }
}
