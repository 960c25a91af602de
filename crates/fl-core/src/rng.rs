//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (spawn_serial * MIXING_CONSTANT)
//!
//! `spawn_serial` counts spawns over the whole run, so an agent that reuses a
//! recycled slot still gets a fresh stream.  The mixing constant is the
//! 64-bit fractional part of the golden ratio, which spreads consecutive
//! serials uniformly across the seed space.  This means:
//!
//! - Agents never share RNG state (no contention, no ordering dependency).
//! - Results do not depend on how rayon splits the agent range.
//! - All RNG calls are local to the owning worker; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Vec2;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Stored in a parallel `Vec<AgentRng>` alongside the other SoA arrays and
/// handed out one `&mut` per worker by `par_iter_mut`.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and a spawn serial.
    pub fn new(global_seed: u64, spawn_serial: u64) -> Self {
        let seed = global_seed ^ spawn_serial.wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Uniform sample in `[-1, 1]`.
    #[inline]
    pub fn signed_unit(&mut self) -> f32 {
        self.0.gen_range(-1.0_f32..=1.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (spawn placement, etc.).
///
/// Used only in single-threaded contexts between phases.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Uniform sample from the disc of `radius` around `center`.
    pub fn point_in_disc(&mut self, center: Vec2, radius: f32) -> Vec2 {
        if radius <= 0.0 {
            return center;
        }
        // sqrt keeps the density uniform over area rather than over radius.
        let r = radius * self.0.gen_range(0.0_f32..=1.0).sqrt();
        let angle = self.0.gen_range(0.0_f32..std::f32::consts::TAU);
        center + Vec2::from_angle(angle) * r
    }

    /// Uniform heading angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.0.gen_range(0.0_f32..std::f32::consts::TAU)
    }
}
