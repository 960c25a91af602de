//! `swarm`: a few thousand agents in a walled arena chasing a circling
//! pointer, with scripted clicks on a behaviour switch and a spawner.
//!
//! Run with:
//!   RUST_LOG=info cargo run -p swarm --release
//!
//! `RUST_LOG=fl_sim=debug` adds one line per tick.

use std::time::Instant;

use anyhow::Result;
use tracing::info;

use fl_agent::{AgentStore, SpawnRequest};
use fl_core::{BehaviorConfig, SimConfig, SimRng, Tick, Vec2};
use fl_sim::{
    ActionController, ActionKind, PlayerActionConfig, SimBuilder, SimObserver, SpawnBurst,
    TickInput,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 4_000;
const SEED:        u64   = 42;
const TOTAL_TICKS: u64   = 1_500;
/// Log a snapshot summary every N ticks.
const OUTPUT_INTERVAL_TICKS: u64 = 250;
const ARENA_HALF:  f32   = 60.0;
const POINTER_ORBIT: f32 = 25.0;

// ── Behaviours ────────────────────────────────────────────────────────────────

fn calm() -> BehaviorConfig {
    BehaviorConfig {
        speed:                  6.0,
        random_turn_force:      2.0,
        turn_variation_speed:   3.0,
        mouse_attraction_force: 0.05,
        ..BehaviorConfig::default()
    }
}

fn scatter() -> BehaviorConfig {
    BehaviorConfig {
        speed:           9.0,
        repulsion_force: 12.0,
        repulsion_range: 4.0,
        align_force:     0.0,
        color:           [1.0, 0.3, 0.2, 1.0],
        ..calm()
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

struct SummaryObserver {
    start: Instant,
}

impl SimObserver for SummaryObserver {
    fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore) {
        let n = agents.live_count().max(1) as f32;
        let centroid = agents
            .agent_ids()
            .fold(Vec2::ZERO, |acc, a| acc + agents.positions[a.index()])
            / n;
        info!(
            tick = tick.0,
            live = agents.live_count(),
            centroid = %centroid,
            elapsed_s = self.start.elapsed().as_secs_f64(),
            "snapshot"
        );
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = SimConfig {
        total_ticks:           TOTAL_TICKS,
        seed:                  SEED,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
        ..SimConfig::default()
    };
    let calm = calm().into_handle();

    let mut rng = SimRng::new(SEED);
    let spawns: Vec<_> = (0..AGENT_COUNT)
        .map(|i| {
            SpawnRequest::new(rng.point_in_disc(Vec2::ZERO, ARENA_HALF * 0.8), rng.angle(), calm.clone())
                // Every tenth agent ignores the player.
                .with_controllable(i % 10 != 0)
        })
        .collect();

    let mut sim = SimBuilder::new(config, calm.clone())
        .walled_box(Vec2::splat(-ARENA_HALF), Vec2::splat(ARENA_HALF))
        .spawn_all(spawns)
        .capacity(AGENT_COUNT * 2)
        .build()?;

    let mut controller = ActionController::new(
        calm.clone(),
        [
            PlayerActionConfig {
                kind:             ActionKind::SwitchBehaviour(scatter().into_handle()),
                max_use_duration: 2.0,
                reload_delay:     1.0,
                reload_speed:     0.5,
            },
            PlayerActionConfig {
                kind:             ActionKind::SpawnBoids(SpawnBurst {
                    spawn_interval: 0.1,
                    spawn_count:    20,
                    spawn_radius:   3.0,
                }),
                max_use_duration: 1.0,
                reload_delay:     2.0,
                reload_speed:     1.0,
            },
        ],
        SEED,
    )?;

    let mut observer = SummaryObserver { start: Instant::now() };
    let dt = sim.config.fixed_dt_secs;
    let start = Instant::now();

    while sim.now() < sim.config.end_tick() {
        let now = sim.now();
        let t = now.0 as f32 * dt;
        let pointer = Vec2::from_angle(t * 0.5) * POINTER_ORBIT;
        // Scripted input: hold the switch for 3 s at t = 5 s, the spawner
        // for 1.5 s at t = 15 s.
        let held = [(5.0..8.0).contains(&t), (15.0..16.5).contains(&t)];

        let mut input = TickInput::new(dt, pointer);
        input.merge(controller.update(&held, dt, pointer, &sim.agents));

        observer.on_tick_start(now);
        let stats = sim.step(input)?;
        observer.on_tick_end(now, stats.live);
        if now.0.is_multiple_of(OUTPUT_INTERVAL_TICKS) {
            observer.on_snapshot(now, &sim.agents);
        }
    }
    observer.on_sim_end(sim.now());

    let secs = start.elapsed().as_secs_f64();
    let agent_ticks = sim.live_count() as f64 * TOTAL_TICKS as f64;
    info!(
        ticks = TOTAL_TICKS,
        live = sim.live_count(),
        threads = sim.num_threads(),
        wall_s = secs,
        agent_ticks_per_s = agent_ticks / secs.max(f64::EPSILON),
        "run complete"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
