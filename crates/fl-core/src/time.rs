//! Simulation time model.
//!
//! # Design
//!
//! The core is driven by an external fixed-timestep clock.  Time is counted
//! as a monotonically increasing `Tick`; the mapping to simulated seconds is
//! held in `SimClock`:
//!
//!   elapsed_secs = tick * fixed_dt_secs
//!
//! The per-tick `dt` handed to `Sim::step` is normally `fixed_dt_secs`,
//! but callers driving the core from a variable frame clock may pass their
//! own value; it is captured once at the start of the tick and held constant
//! for every phase.

use std::fmt;

use crate::{BehaviorConfig, FlockError, FlockResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and accumulated simulated time.
///
/// Elapsed time is accumulated from the `dt` actually applied each tick, so
/// it stays correct when callers step with a variable `dt`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Nominal seconds per tick.
    pub fixed_dt_secs: f32,
    /// The current tick, advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
    /// Simulated seconds elapsed since tick 0.
    pub elapsed_secs: f64,
}

impl SimClock {
    pub fn new(fixed_dt_secs: f32) -> Self {
        Self {
            fixed_dt_secs,
            current_tick: Tick::ZERO,
            elapsed_secs: 0.0,
        }
    }

    /// Advance the clock by one tick of length `dt`.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.elapsed_secs += dt as f64;
    }

    /// How many whole ticks span `secs` seconds at the nominal rate?
    /// (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        (secs / self.fixed_dt_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Loaded externally (level config) and immutable for the session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per tick of the driving fixed-step clock.
    pub fixed_dt_secs: f32,

    /// Ticks simulated by `Sim::run`.  `Sim::step` ignores it.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for the phase pool.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Deliver an observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Cell edge length of the agent partition grid, world units.
    pub agent_cell_size: f32,

    /// Cell edge length of the obstacle partition grid, world units.
    pub obstacle_cell_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt_secs:         1.0 / 50.0,
            total_ticks:           0,
            seed:                  0,
            num_threads:           None,
            output_interval_ticks: 0,
            agent_cell_size:       2.0,
            obstacle_cell_size:    4.0,
        }
    }
}

impl SimConfig {
    /// The tick at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.fixed_dt_secs)
    }

    /// Fail fast on values the simulation cannot start with.
    pub fn validate(&self) -> FlockResult<()> {
        let positive = [
            ("fixed_dt_secs", self.fixed_dt_secs),
            ("agent_cell_size", self.agent_cell_size),
            ("obstacle_cell_size", self.obstacle_cell_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FlockError::Config(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        if self.num_threads == Some(0) {
            return Err(FlockError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Validate a behavior config, including its query extent against this
    /// run's grid cell sizes.
    pub fn validate_behavior(&self, behavior: &BehaviorConfig) -> FlockResult<()> {
        behavior.validate()?;
        behavior.check_query_extent(self.agent_cell_size, self.obstacle_cell_size)
    }
}
