//! The `Sim` struct and its tick loop.

use rayon::ThreadPool;
use tracing::{debug, warn};

use fl_agent::{AgentRngs, AgentStore, SpawnRequest};
use fl_behavior::ForceModel;
use fl_core::{AgentId, ConfigHandle, SimClock, SimConfig, Tick, Vec2};
use fl_mobility::PartitionTracker;
use fl_spatial::{GridView, ObstacleMap, SpatialGrid};

use crate::phases;
use crate::{AgentFrame, SimError, SimObserver, SimResult, TickInput};

/// Counters for one completed tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick:         Tick,
    pub despawned:    usize,
    pub config_swaps: usize,
    pub spawned:      usize,
    /// Grid entries created (first cell) or moved between cells.
    pub migrations:   usize,
    pub live:         usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each call to [`step`](Self::step) runs one tick:
///
/// 0. **Lifecycle** (sequential): despawns (grid entry purged at once),
///    config swaps, spawns.
/// 1. **Assign**: agents without a cell are inserted into the agent grid.
/// 2. **Move**: `position += velocity * dt`, then grid entries follow their
///    agent to its new cell.
/// 3. **Settle**: buckets are sorted so later phases read them in a fixed
///    order regardless of which worker wrote first.
/// 4. **Neighbours**: alignment aggregate per agent, read-only over the grid.
/// 5. **Forces**: acceleration and next velocity per agent, read-only over
///    the agent and obstacle grids.
///
/// Phases 1, 2, 4 and 5 are rayon parallel passes on the simulation's own
/// pool.  Phases 4 and 5 read through a [`GridView`], which cannot coexist
/// with a writer.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (tick length, seed, cell sizes, …).
    pub config: SimConfig,

    /// Simulation clock: tracks the current tick and simulated seconds.
    pub clock: SimClock,

    /// Agent state (SoA arrays).
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Pointer target used by [`run`](Self::run) and
    /// [`run_ticks`](Self::run_ticks).
    pub pointer: Vec2,

    pub(crate) grid:           SpatialGrid<AgentId>,
    pub(crate) obstacles:      ObstacleMap,
    pub(crate) default_config: ConfigHandle,
    pub(crate) model:          ForceModel,
    pub(crate) pool:           ThreadPool,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Advance the simulation by one tick.
    ///
    /// The input is validated before anything is touched; on error the
    /// previous settled state is left exactly as it was.
    pub fn step(&mut self, input: TickInput) -> SimResult<TickStats> {
        input.validate()?;
        self.check_query_extents(&input)?;
        let tick = self.clock.current_tick;
        let TickInput { dt, pointer, config_changes, spawns, despawns } = input;

        let despawned = self.apply_despawns(&despawns);
        let config_swaps = self.apply_config_changes(config_changes);
        let spawned = self.apply_spawns(spawns);

        let Self { agents, rngs, grid, obstacles, model, pool, .. } = self;
        let migrations = pool.install(|| {
            let inserted = phases::assign_cells(agents, grid);
            let moved = phases::integrate_and_migrate(agents, grid, dt);
            grid.sort_buckets();

            let view = grid.view();
            phases::aggregate_neighbors(agents, &view);
            phases::apply_forces(*model, agents, rngs, &view, obstacles, dt, pointer);
            inserted + moved
        });

        self.clock.advance(dt);
        let stats = TickStats {
            tick,
            despawned,
            config_swaps,
            spawned,
            migrations,
            live: self.agents.live_count(),
        };
        debug!(
            tick = tick.0,
            live = stats.live,
            spawned,
            despawned,
            config_swaps,
            migrations,
            "tick settled"
        );
        Ok(stats)
    }

    /// Run the simulation from the current tick to `config.end_tick()` with
    /// the nominal `dt` and the current [`pointer`](Self::pointer).
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.observed_tick(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_tick(observer)?;
        }
        Ok(())
    }

    /// Position, velocity and scale of every live agent, in id order.
    pub fn frames(&self) -> Vec<AgentFrame> {
        let mut out = Vec::with_capacity(self.agents.live_count());
        self.frames_into(&mut out);
        out
    }

    /// [`frames`](Self::frames) into a reused buffer.
    pub fn frames_into(&self, out: &mut Vec<AgentFrame>) {
        out.clear();
        let a = &self.agents;
        out.extend(a.agent_ids().map(|id| {
            let i = id.index();
            AgentFrame {
                id,
                position:      a.positions[i],
                velocity:      a.velocities[i],
                display_scale: a.display_scales[i],
            }
        }));
    }

    /// Clear the agent grid and reinsert every live agent at its recorded
    /// cell.
    pub fn rebuild_partition(&mut self) {
        self.grid.clear();
        let mut reinserted = 0usize;
        for agent in self.agents.agent_ids() {
            if let Some(cell) = self.agents.cells[agent.index()] {
                self.grid.insert(cell, agent);
                reinserted += 1;
            }
        }
        self.grid.sort_buckets();
        debug!(reinserted, "agent partition rebuilt");
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.agents.live_count()
    }

    /// Config given to agents when a player action is released.
    pub fn default_config(&self) -> &ConfigHandle {
        &self.default_config
    }

    pub fn obstacles(&self) -> &ObstacleMap {
        &self.obstacles
    }

    /// Read-only view of the agent grid.
    pub fn grid_view(&mut self) -> GridView<'_, AgentId> {
        self.grid.view()
    }

    /// Worker threads in the phase pool.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    // ── Tick internals ────────────────────────────────────────────────────

    fn observed_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let stats = self.step(TickInput::new(self.config.fixed_dt_secs, self.pointer))?;
        observer.on_tick_end(now, stats.live);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.agents);
        }
        Ok(())
    }

    /// Reject behaviours whose grid queries are too wide for this run's
    /// cell sizes.  Runs before any state is touched.
    fn check_query_extents(&self, input: &TickInput) -> SimResult<()> {
        let SimConfig { agent_cell_size, obstacle_cell_size, .. } = self.config;
        for (agent, config) in &input.config_changes {
            config
                .check_query_extent(agent_cell_size, obstacle_cell_size)
                .map_err(|e| SimError::InvalidInput(format!("config change for {agent}: {e}")))?;
        }
        for (i, req) in input.spawns.iter().enumerate() {
            req.config
                .check_query_extent(agent_cell_size, obstacle_cell_size)
                .map_err(|e| SimError::InvalidInput(format!("spawn #{i}: {e}")))?;
        }
        Ok(())
    }

    fn apply_despawns(&mut self, despawns: &[AgentId]) -> usize {
        let tracker = PartitionTracker::new(&self.grid);
        let mut count = 0;
        for &agent in despawns {
            match self.agents.despawn(agent) {
                None => warn!(%agent, "despawn of unknown agent ignored"),
                Some(cell) => {
                    count += 1;
                    if let Some(cell) = cell
                        && !tracker.evict(agent, cell)
                    {
                        warn!(%agent, ?cell, "despawned agent was missing from its grid cell");
                    }
                }
            }
        }
        count
    }

    fn apply_config_changes(&mut self, changes: Vec<(AgentId, ConfigHandle)>) -> usize {
        let mut count = 0;
        for (agent, config) in changes {
            if self.agents.set_config(agent, config) {
                count += 1;
            } else {
                warn!(%agent, "config change for unknown agent ignored");
            }
        }
        count
    }

    fn apply_spawns(&mut self, spawns: Vec<SpawnRequest>) -> usize {
        let count = spawns.len();
        for req in spawns {
            let agent = self.agents.spawn(req);
            self.rngs.reseed(agent);
        }
        count
    }
}
