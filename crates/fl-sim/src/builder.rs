//! Fluent builder for constructing a [`Sim`].

use rayon::ThreadPoolBuilder;
use tracing::info;

use fl_agent::{AgentStoreBuilder, SpawnRequest};
use fl_behavior::ForceModel;
use fl_core::{ConfigHandle, SimConfig, Vec2};
use fl_spatial::{ObstacleMapBuilder, ObstacleSegment, SpatialGrid};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick length, seed, cell sizes, thread count, …
/// - default [`ConfigHandle`]: the behaviour agents return to when a player
///   action is released
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                  |
/// |---------------------|--------------------------|
/// | `.spawn(req)`       | No initial agents        |
/// | `.segment(seg)`     | No obstacles             |
/// | `.walled_box(a, b)` | No obstacles             |
/// | `.capacity(n)`      | Number of initial spawns |
///
/// # Example
///
/// ```rust,ignore
/// let behavior = BehaviorConfig::default().into_handle();
/// let mut sim = SimBuilder::new(config, behavior.clone())
///     .walled_box(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0))
///     .spawn(SpawnRequest::new(Vec2::ZERO, 0.0, behavior))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:         SimConfig,
    default_config: ConfigHandle,
    spawns:         Vec<SpawnRequest>,
    segments:       Vec<ObstacleSegment>,
    boxes:          Vec<(Vec2, Vec2)>,
    capacity:       usize,
}

impl SimBuilder {
    pub fn new(config: SimConfig, default_config: ConfigHandle) -> Self {
        Self {
            config,
            default_config,
            spawns:   Vec::new(),
            segments: Vec::new(),
            boxes:    Vec::new(),
            capacity: 0,
        }
    }

    /// Queue one initial agent.  Initial agents get ids in queue order.
    pub fn spawn(mut self, req: SpawnRequest) -> Self {
        self.spawns.push(req);
        self
    }

    /// Queue many initial agents.
    pub fn spawn_all(mut self, reqs: impl IntoIterator<Item = SpawnRequest>) -> Self {
        self.spawns.extend(reqs);
        self
    }

    /// Add one static obstacle segment.
    pub fn segment(mut self, segment: ObstacleSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Add many static obstacle segments.
    pub fn segments(mut self, segments: impl IntoIterator<Item = ObstacleSegment>) -> Self {
        self.segments.extend(segments);
        self
    }

    /// Enclose the rectangle `[min, max]` with four inward-facing walls.
    pub fn walled_box(mut self, min: Vec2, max: Vec2) -> Self {
        self.boxes.push((min, max));
        self
    }

    /// Reserve agent slots beyond the initial spawns.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validate every input, build the grids and worker pool, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;
        self.config
            .validate_behavior(&self.default_config)
            .map_err(|e| SimError::Config(format!("default behaviour: {e}")))?;
        for (i, req) in self.spawns.iter().enumerate() {
            req.validate()
                .and_then(|()| self.config.validate_behavior(&req.config))
                .map_err(|e| SimError::Config(format!("initial spawn #{i}: {e}")))?;
        }

        // ── Static obstacles ──────────────────────────────────────────────
        let mut obstacles = ObstacleMapBuilder::new(self.config.obstacle_cell_size);
        for segment in self.segments {
            obstacles.add_segment(segment);
        }
        for (min, max) in self.boxes {
            obstacles.add_box(min, max)?;
        }
        let obstacles = obstacles.build()?;

        // ── Agents ────────────────────────────────────────────────────────
        let grid = SpatialGrid::new(self.config.agent_cell_size)?;
        let (agents, rngs) = AgentStoreBuilder::new(self.config.seed)
            .capacity(self.capacity)
            .spawn_all(self.spawns)
            .build();

        // 0 lets rayon pick the number of logical cores.
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads.unwrap_or(0))
            .thread_name(|i| format!("fl-sim-{i}"))
            .build()?;

        info!(
            agents = agents.live_count(),
            obstacles = obstacles.len(),
            threads = pool.current_num_threads(),
            seed = self.config.seed,
            "simulation built"
        );

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            agents,
            rngs,
            pointer: Vec2::ZERO,
            grid,
            obstacles,
            default_config: self.default_config,
            model: ForceModel,
            pool,
        })
    }
}
