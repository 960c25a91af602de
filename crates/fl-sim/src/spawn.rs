//! Timed burst spawning around a point.

use fl_agent::SpawnRequest;
use fl_core::{ConfigHandle, SimRng, Vec2};

use crate::{SimError, SimResult};

/// How a spawner emits agents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnBurst {
    /// Seconds between bursts.
    pub spawn_interval: f32,
    /// Agents per burst.
    pub spawn_count:    u32,
    /// Agents are placed uniformly inside this disc around the centre.
    pub spawn_radius:   f32,
}

impl SpawnBurst {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.spawn_interval.is_finite() && self.spawn_interval > 0.0) {
            return Err(SimError::Config(format!(
                "spawn_interval must be finite and > 0, got {}",
                self.spawn_interval
            )));
        }
        if !(self.spawn_radius.is_finite() && self.spawn_radius >= 0.0) {
            return Err(SimError::Config(format!(
                "spawn_radius must be finite and >= 0, got {}",
                self.spawn_radius
            )));
        }
        Ok(())
    }
}

/// Emits a burst every `spawn_interval` seconds of accumulated time.
///
/// A fresh (or [`reset`](Self::reset)) spawner fires on its first update.
#[derive(Clone, Debug)]
pub struct Spawner {
    burst:   SpawnBurst,
    elapsed: f32,
}

impl Spawner {
    pub fn new(burst: SpawnBurst) -> Self {
        Self { burst, elapsed: burst.spawn_interval }
    }

    pub fn burst(&self) -> &SpawnBurst {
        &self.burst
    }

    /// Prime the spawner so the next update fires immediately.
    pub fn reset(&mut self) {
        self.elapsed = self.burst.spawn_interval;
    }

    /// Advance by `dt` and append one burst of requests to `out` for every
    /// interval that elapsed.  Returns how many requests were added.
    pub fn update(
        &mut self,
        dt:     f32,
        center: Vec2,
        config: &ConfigHandle,
        rng:    &mut SimRng,
        out:    &mut Vec<SpawnRequest>,
    ) -> usize {
        let before = out.len();
        let interval = self.burst.spawn_interval;
        // An unvalidated non-positive interval degrades to one burst per
        // update.
        let bursts = if interval > 0.0 {
            self.elapsed += dt;
            let mut n = 0;
            while self.elapsed >= interval {
                self.elapsed -= interval;
                n += 1;
            }
            n
        } else {
            1
        };
        for _ in 0..bursts {
            self.emit(center, config, rng, out);
        }
        out.len() - before
    }

    fn emit(&self, center: Vec2, config: &ConfigHandle, rng: &mut SimRng, out: &mut Vec<SpawnRequest>) {
        for _ in 0..self.burst.spawn_count {
            let position = rng.point_in_disc(center, self.burst.spawn_radius);
            out.push(SpawnRequest::new(position, rng.angle(), config.clone()));
        }
    }
}
