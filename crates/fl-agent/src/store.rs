//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The force phase hands each rayon worker `&mut` access to one agent's RNG
//! while every worker reads the whole position column.  Keeping RNGs out of
//! `AgentStore` lets callers hold `&mut AgentRngs` next to the store's
//! columns:
//!
//! ```ignore
//! // fl-sim force phase (simplified):
//! let cols = store.columns_mut();
//! let positions: &[Vec2] = cols.positions;
//! rngs.inner
//!     .par_iter_mut()
//!     .zip(cols.velocities.par_iter_mut())
//!     .for_each(|(rng, vel)| steer(positions, vel, rng));
//! ```

use fl_core::{AgentId, AgentRng, CellCoord, ConfigHandle, Vec2};

use crate::{NeighborAggregate, SpawnRequest};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, indexed like [`AgentStore`] columns.
pub struct AgentRngs {
    pub inner:   Vec<AgentRng>,
    global_seed: u64,
    /// Spawns seen so far; seeds the next agent's stream.
    serial:      u64,
}

impl AgentRngs {
    pub fn new(global_seed: u64) -> Self {
        Self { inner: Vec::new(), global_seed, serial: 0 }
    }

    /// Give slot `agent` a fresh stream.  The slot is either recycled
    /// (`< len`) or the next one (`== len`).
    pub fn reseed(&mut self, agent: AgentId) {
        let rng = AgentRng::new(self.global_seed, self.serial);
        self.serial += 1;
        match agent.index() {
            i if i < self.inner.len() => self.inner[i] = rng,
            i => {
                debug_assert_eq!(i, self.inner.len(), "agent slots must be dense");
                self.inner.push(rng);
            }
        }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── ColumnsMut ────────────────────────────────────────────────────────────────

/// Disjoint borrows of every column, for phases that read some columns while
/// writing others.  Liveness and configs stay read-only.
pub struct ColumnsMut<'a> {
    pub alive:         &'a [bool],
    pub positions:     &'a mut [Vec2],
    pub velocities:    &'a mut [Vec2],
    pub accelerations: &'a mut [Vec2],
    pub headings:      &'a mut [Vec2],
    pub wander:        &'a mut [f32],
    pub cells:         &'a mut [Option<CellCoord>],
    pub neighbors:     &'a mut [NeighborAggregate],
    pub configs:       &'a [ConfigHandle],
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` column has exactly [`slot_count`](Self::slot_count) elements;
/// the `AgentId` value is the index into all of them:
///
/// ```ignore
/// let pos = store.positions[agent.index()];  // O(1), cache-friendly
/// ```
///
/// Dead slots keep stale values; phases skip them via [`alive`](Self::alive).
/// Each column is written by exactly one phase per tick (see `fl-sim`).
pub struct AgentStore {
    // ── Kinematics ────────────────────────────────────────────────────────
    /// World position.  Written only by position integration.
    pub positions: Vec<Vec2>,

    /// Velocity; magnitude equals the agent's configured speed after every
    /// force step.
    pub velocities: Vec<Vec2>,

    /// Scratch acceleration, rebuilt from zero every force step.
    pub accelerations: Vec<Vec2>,

    /// Last well-defined unit heading.  Fallback when velocity degenerates.
    pub headings: Vec<Vec2>,

    /// Wander value in `[-1, 1]` driving the random turn term.
    pub wander: Vec<f32>,

    // ── Partitioning ──────────────────────────────────────────────────────
    /// Grid cell the agent is registered in.  `None` until the first
    /// partition pass after spawn.
    pub cells: Vec<Option<CellCoord>>,

    /// Neighbour summary for the current tick.
    pub neighbors: Vec<NeighborAggregate>,

    // ── Behaviour / presentation ──────────────────────────────────────────
    /// Shared behaviour config.  Swapped, never mutated.
    pub configs: Vec<ConfigHandle>,

    /// Presentation scale, passed through untouched.
    pub display_scales: Vec<f32>,

    /// Whether player mode switches apply to this agent.
    pub controllable: Vec<bool>,

    alive: Vec<bool>,
    free:  Vec<AgentId>,
    live:  usize,
}

impl AgentStore {
    /// An empty store with room for `capacity` agents before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions:      Vec::with_capacity(capacity),
            velocities:     Vec::with_capacity(capacity),
            accelerations:  Vec::with_capacity(capacity),
            headings:       Vec::with_capacity(capacity),
            wander:         Vec::with_capacity(capacity),
            cells:          Vec::with_capacity(capacity),
            neighbors:      Vec::with_capacity(capacity),
            configs:        Vec::with_capacity(capacity),
            display_scales: Vec::with_capacity(capacity),
            controllable:   Vec::with_capacity(capacity),
            alive:          Vec::with_capacity(capacity),
            free:           Vec::new(),
            live:           0,
        }
    }

    /// Number of live agents.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// `true` if there are no live agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Length of every column (live + recyclable slots).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.alive.len()
    }

    /// Liveness flag per slot.
    #[inline]
    pub fn alive(&self) -> &[bool] {
        &self.alive
    }

    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.alive.get(agent.index()).copied().unwrap_or(false)
    }

    /// Iterator over live `AgentId`s in ascending slot order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| AgentId(i as u32))
    }

    /// Live agents flagged controllable.
    pub fn controllable_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids().filter(|a| self.controllable[a.index()])
    }

    /// Split the store into per-column borrows.
    pub fn columns_mut(&mut self) -> ColumnsMut<'_> {
        ColumnsMut {
            alive:         &self.alive,
            positions:     &mut self.positions,
            velocities:    &mut self.velocities,
            accelerations: &mut self.accelerations,
            headings:      &mut self.headings,
            wander:        &mut self.wander,
            cells:         &mut self.cells,
            neighbors:     &mut self.neighbors,
            configs:       &self.configs,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Create an agent, recycling a free slot when one exists.
    ///
    /// The agent starts with a unit velocity along its heading, zero
    /// acceleration and no grid cell.  The caller is responsible for
    /// reseeding the slot's RNG.
    pub fn spawn(&mut self, req: SpawnRequest) -> AgentId {
        let heading = Vec2::from_angle(req.heading_angle);
        match self.free.pop() {
            Some(agent) => {
                let i = agent.index();
                self.positions[i]      = req.position;
                self.velocities[i]     = heading;
                self.accelerations[i]  = Vec2::ZERO;
                self.headings[i]       = heading;
                self.wander[i]         = 0.0;
                self.cells[i]          = None;
                self.neighbors[i]      = NeighborAggregate::default();
                self.configs[i]        = req.config;
                self.display_scales[i] = req.display_scale;
                self.controllable[i]   = req.controllable;
                self.alive[i]          = true;
                self.live += 1;
                agent
            }
            None => {
                let agent = AgentId(self.alive.len() as u32);
                self.positions.push(req.position);
                self.velocities.push(heading);
                self.accelerations.push(Vec2::ZERO);
                self.headings.push(heading);
                self.wander.push(0.0);
                self.cells.push(None);
                self.neighbors.push(NeighborAggregate::default());
                self.configs.push(req.config);
                self.display_scales.push(req.display_scale);
                self.controllable.push(req.controllable);
                self.alive.push(true);
                self.live += 1;
                agent
            }
        }
    }

    /// Mark `agent` dead and free its slot.
    ///
    /// Returns `None` if `agent` is not live; otherwise the grid cell it was
    /// registered in (if any), which the caller must purge.
    pub fn despawn(&mut self, agent: AgentId) -> Option<Option<CellCoord>> {
        if !self.is_alive(agent) {
            return None;
        }
        let i = agent.index();
        self.alive[i] = false;
        self.live -= 1;
        self.free.push(agent);
        Some(self.cells[i].take())
    }

    /// Swap the behaviour config of a live agent.  Returns `false` if the
    /// agent is not live.
    pub fn set_config(&mut self, agent: AgentId, config: ConfigHandle) -> bool {
        if !self.is_alive(agent) {
            return false;
        }
        self.configs[agent.index()] = config;
        true
    }
}
