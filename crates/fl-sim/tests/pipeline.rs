//! End-to-end tick pipeline: build, drive with player input, observe.

use fl_core::{BehaviorConfig, SimConfig, SimRng, Tick, Vec2};
use fl_sim::{
    ActionController, ActionKind, PlayerActionConfig, SimBuilder, SimObserver, SpawnBurst,
    SpawnRequest, TickInput,
};

struct LiveLog(Vec<(Tick, usize)>);

impl SimObserver for LiveLog {
    fn on_tick_end(&mut self, tick: Tick, live: usize) {
        self.0.push((tick, live));
    }
}

#[test]
fn player_driven_session() {
    let calm = BehaviorConfig::default().into_handle();
    let scatter = BehaviorConfig { repulsion_force: 25.0, repulsion_range: 2.0, ..BehaviorConfig::default() }
        .into_handle();

    let config = SimConfig { num_threads: Some(3), seed: 11, ..SimConfig::default() };
    let mut rng = SimRng::new(config.seed);
    let initial: Vec<_> = (0..150)
        .map(|_| SpawnRequest::new(rng.point_in_disc(Vec2::ZERO, 8.0), rng.angle(), calm.clone()))
        .collect();
    let mut sim = SimBuilder::new(config, calm.clone())
        .walled_box(Vec2::new(-15.0, -15.0), Vec2::new(15.0, 15.0))
        .spawn_all(initial)
        .build()
        .unwrap();

    let actions = [
        PlayerActionConfig {
            kind:             ActionKind::SwitchBehaviour(scatter.clone()),
            max_use_duration: 0.5,
            reload_delay:     0.2,
            reload_speed:     1.0,
        },
        PlayerActionConfig {
            kind:             ActionKind::SpawnBoids(SpawnBurst {
                spawn_interval: 0.1,
                spawn_count:    5,
                spawn_radius:   1.0,
            }),
            max_use_duration: 0.3,
            reload_delay:     0.5,
            reload_speed:     0.5,
        },
    ];
    let mut controller = ActionController::new(calm.clone(), actions, 99).unwrap();

    let dt = sim.config.fixed_dt_secs;
    for i in 0..200u32 {
        let t = i as f32 * dt;
        let pointer = Vec2::new(6.0 * t.cos(), 6.0 * t.sin());
        let held = [(20..60).contains(&i), (100..130).contains(&i)];

        let patch = controller.update(&held, dt, pointer, &sim.agents);
        let mut input = TickInput::new(dt, pointer);
        input.merge(patch);
        if i == 150 {
            input = input.with_despawns(sim.agents.agent_ids().take(10));
        }
        let stats = sim.step(input).unwrap();
        assert_eq!(stats.live, sim.agents.live_count());

        for frame in sim.frames() {
            assert!(frame.position.is_finite() && frame.velocity.is_finite(), "{frame:?}");
        }
    }

    // Budget of 0.3 s at 0.1 s intervals: a handful of bursts of 5.
    let spawned = sim.live_count() + 10 - 150;
    assert!(spawned >= 10 && spawned % 5 == 0, "spawned {spawned}");
    // Switch was released (budget or button), everyone is back to calm.
    assert!(sim.agents.configs.iter().all(|c| **c == *calm));

    let mut log = LiveLog(Vec::new());
    sim.run_ticks(5, &mut log).unwrap();
    assert_eq!(log.0.len(), 5);
    assert_eq!(log.0[0].0, Tick(200));
}
