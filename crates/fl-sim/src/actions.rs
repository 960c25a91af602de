//! Player actions: timed behaviour switches and burst spawns.
//!
//! Each action slot (e.g. one per mouse button) has a use budget of
//! `max_use_duration` seconds.  Holding the button spends it; after
//! `reload_delay` seconds of not using the action it refills at
//! `reload_speed` seconds per second.
//!
//! ```text
//!   press ──▶ Engaged ──(release or budget spent)──▶ Released
//!                │                                      │
//!   SwitchBehaviour: controllable agents get the        controllable agents
//!                    action's config                    get the default config
//!   SpawnBoids:      spawner runs at the pointer        spawner stops
//! ```

use tracing::debug;

use fl_agent::AgentStore;
use fl_core::{ConfigHandle, SimRng, Vec2};

use crate::{SimError, SimResult, SpawnBurst, Spawner, TickPatch};

// ── Configuration ─────────────────────────────────────────────────────────────

/// What an action does while engaged.
#[derive(Clone, Debug)]
pub enum ActionKind {
    /// Swap every controllable agent to this config.
    SwitchBehaviour(ConfigHandle),
    /// Spawn bursts of agents at the pointer.
    SpawnBoids(SpawnBurst),
}

#[derive(Clone, Debug)]
pub struct PlayerActionConfig {
    pub kind:             ActionKind,
    /// Seconds of use available from a full gauge.
    pub max_use_duration: f32,
    /// Seconds after release before the gauge starts refilling.
    pub reload_delay:     f32,
    /// Seconds of use regained per second once refilling.
    pub reload_speed:     f32,
}

impl PlayerActionConfig {
    pub fn validate(&self) -> SimResult<()> {
        let fields = [
            ("max_use_duration", self.max_use_duration),
            ("reload_delay", self.reload_delay),
            ("reload_speed", self.reload_speed),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::Config(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        match &self.kind {
            ActionKind::SwitchBehaviour(config) => config.validate()?,
            ActionKind::SpawnBoids(burst) => burst.validate()?,
        }
        Ok(())
    }
}

// ── ActionGauge ───────────────────────────────────────────────────────────────

/// Edge of an action's engaged state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionEvent {
    Engaged,
    Released,
}

/// Use/reload bookkeeping for one action slot.
#[derive(Clone, Debug, Default)]
pub struct ActionGauge {
    use_time:      f32,
    since_release: f32,
    engaged:       bool,
    was_held:      bool,
}

impl ActionGauge {
    /// Advance by `dt` with the button state `held`.
    ///
    /// An action engages on a press edge while budget remains, and releases
    /// when the button goes up or the budget runs out.  Engaging and
    /// releasing within one update cancel out and report nothing.
    pub fn update(&mut self, config: &PlayerActionConfig, held: bool, dt: f32) -> Option<ActionEvent> {
        let pressed = held && !self.was_held;
        self.was_held = held;

        let mut engaged_now = false;
        if pressed && !self.engaged && self.use_time < config.max_use_duration {
            self.engaged = true;
            engaged_now = true;
        }

        let mut released_now = false;
        if self.engaged {
            self.use_time += dt;
            self.since_release = 0.0;
            if !held || self.use_time >= config.max_use_duration {
                self.engaged = false;
                released_now = true;
            }
        }

        self.since_release += dt;
        if !self.engaged && self.since_release > config.reload_delay {
            self.use_time = (self.use_time - dt * config.reload_speed).max(0.0);
        }

        match (engaged_now, released_now) {
            (true, false) => Some(ActionEvent::Engaged),
            (false, true) => Some(ActionEvent::Released),
            _ => None,
        }
    }

    #[inline]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Seconds of use spent and not yet reloaded.
    #[inline]
    pub fn use_time(&self) -> f32 {
        self.use_time
    }

    /// Fraction of the budget still available, in `[0, 1]`.
    pub fn remaining(&self, config: &PlayerActionConfig) -> f32 {
        if config.max_use_duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.use_time / config.max_use_duration).clamp(0.0, 1.0)
    }
}

// ── ActionController ──────────────────────────────────────────────────────────

struct ActionSlot {
    config:  PlayerActionConfig,
    gauge:   ActionGauge,
    spawner: Option<Spawner>,
}

/// Turns per-frame button state into config swaps and spawns for the next
/// tick.
pub struct ActionController {
    default_config: ConfigHandle,
    /// Config of the behaviour switch currently engaged, if any.
    active:         Option<ConfigHandle>,
    slots:          Vec<ActionSlot>,
    rng:            SimRng,
}

impl ActionController {
    /// One slot per entry of `actions`, in order.  `seed` drives spawn
    /// placement.
    pub fn new(
        default_config: ConfigHandle,
        actions:        impl IntoIterator<Item = PlayerActionConfig>,
        seed:           u64,
    ) -> SimResult<Self> {
        let slots = actions
            .into_iter()
            .map(|config| {
                config.validate()?;
                let spawner = match &config.kind {
                    ActionKind::SpawnBoids(burst) => Some(Spawner::new(*burst)),
                    ActionKind::SwitchBehaviour(_) => None,
                };
                Ok(ActionSlot { config, gauge: ActionGauge::default(), spawner })
            })
            .collect::<SimResult<Vec<_>>>()?;
        Ok(Self { default_config, active: None, slots, rng: SimRng::new(seed) })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn gauge(&self, slot: usize) -> Option<&ActionGauge> {
        self.slots.get(slot).map(|s| &s.gauge)
    }

    /// The config new and controllable agents should currently use.
    pub fn current_config(&self) -> &ConfigHandle {
        self.active.as_ref().unwrap_or(&self.default_config)
    }

    /// Advance every slot by `dt`.  `held[i]` is the button state of slot
    /// `i`; missing entries count as not held.
    pub fn update(&mut self, held: &[bool], dt: f32, pointer: Vec2, agents: &AgentStore) -> TickPatch {
        let mut patch = TickPatch::default();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let is_held = held.get(i).copied().unwrap_or(false);
            let event = slot.gauge.update(&slot.config, is_held, dt);

            match (&slot.config.kind, event) {
                (ActionKind::SwitchBehaviour(config), Some(ActionEvent::Engaged)) => {
                    debug!(slot = i, "behaviour switch engaged");
                    self.active = Some(config.clone());
                    switch_all(agents, config, &mut patch);
                }
                (ActionKind::SwitchBehaviour(_), Some(ActionEvent::Released)) => {
                    debug!(slot = i, "behaviour switch released");
                    self.active = None;
                    switch_all(agents, &self.default_config, &mut patch);
                }
                (ActionKind::SpawnBoids(_), Some(ActionEvent::Engaged)) => {
                    debug!(slot = i, "spawner engaged");
                    if let Some(spawner) = slot.spawner.as_mut() {
                        spawner.reset();
                    }
                }
                _ => {}
            }

            if slot.gauge.is_engaged()
                && let Some(spawner) = slot.spawner.as_mut()
            {
                let config = self.active.as_ref().unwrap_or(&self.default_config);
                spawner.update(dt, pointer, config, &mut self.rng, &mut patch.spawns);
            }
        }
        patch
    }
}

fn switch_all(agents: &AgentStore, config: &ConfigHandle, patch: &mut TickPatch) {
    patch
        .config_changes
        .extend(agents.controllable_ids().map(|id| (id, config.clone())));
}
