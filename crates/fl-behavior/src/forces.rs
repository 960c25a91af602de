//! The steering force model.
//!
//! Stateless: every tick an agent's acceleration is rebuilt from zero out of
//! independent terms, then folded into velocity, which is renormalized to the
//! configured speed.  Speed is therefore constant; forces only turn the
//! agent.
//!
//! ```text
//! a  = Σ attraction + Σ repulsion        (agents in range, agent grid)
//!    + alignment                         (neighbour aggregate)
//!    + Σ wall repulsion                  (segments in range, obstacle grid)
//!    + wander                            (per-agent RNG)
//! v += normalize(pointer - p) * mouse_attraction_force
//! v += a * dt
//! v  = normalize(v) * speed              (falls back to last heading)
//! ```

use fl_agent::NeighborAggregate;
use fl_core::{AgentId, AgentRng, BehaviorConfig, ObstacleId, Vec2, query_reach};

use crate::StepContext;

/// Unit vector from `from` to `to`; zero when the points coincide.
#[inline]
fn direction(from: Vec2, to: Vec2) -> Vec2 {
    if from == to {
        Vec2::ZERO
    } else {
        (to - from).normalize_or_zero()
    }
}

/// Read-only per-agent input to [`ForceModel::step`].
pub struct SteeringInput<'s> {
    pub agent:     AgentId,
    pub config:    &'s BehaviorConfig,
    pub neighbors: NeighborAggregate,
}

/// The agent-owned columns [`ForceModel::step`] writes.
pub struct SteeringState<'s> {
    pub velocity:     &'s mut Vec2,
    pub acceleration: &'s mut Vec2,
    pub heading:      &'s mut Vec2,
    pub wander:       &'s mut f32,
}

/// Attraction, repulsion, alignment, wall avoidance, wander and pointer
/// pull, combined in one deterministic pass per agent.
#[derive(Copy, Clone, Debug, Default)]
pub struct ForceModel;

impl ForceModel {
    /// Attraction and repulsion from every other agent in the scanned cells.
    pub fn agent_forces(&self, ctx: &StepContext<'_>, agent: AgentId, config: &BehaviorConfig) -> Vec2 {
        let position = ctx.positions[agent.index()];
        let reach = query_reach(config.attraction_range.max(config.repulsion_range));

        let mut acc = Vec2::ZERO;
        for other in ctx.agents.query_radius(position, reach) {
            if other == agent {
                continue;
            }
            let other_pos = ctx.positions[other.index()];
            let dir = direction(position, other_pos);
            let dist_sq = position.distance_squared(other_pos);
            if dist_sq < config.attraction_range {
                acc += dir * config.attraction_force;
            }
            if dist_sq < config.repulsion_range {
                acc -= dir * config.repulsion_force;
            }
        }
        acc
    }

    /// Steer toward the neighbours' mean heading.  Nothing when no neighbour
    /// was found this tick or the mean velocity is zero.
    pub fn alignment(&self, config: &BehaviorConfig, neighbors: &NeighborAggregate) -> Vec2 {
        if !neighbors.has_neighbors() {
            return Vec2::ZERO;
        }
        neighbors.average_velocity.normalize_or_zero() * config.align_force
    }

    /// Push along the normal of every wall segment in range.
    ///
    /// `scratch` is reused between calls to avoid allocating per agent.
    pub fn obstacle_forces(
        &self,
        ctx:      &StepContext<'_>,
        position: Vec2,
        config:   &BehaviorConfig,
        scratch:  &mut Vec<ObstacleId>,
    ) -> Vec2 {
        if ctx.obstacles.is_empty() {
            return Vec2::ZERO;
        }
        ctx.obstacles
            .collect_near(position, query_reach(config.wall_repulsion_range), scratch);

        let mut acc = Vec2::ZERO;
        for &id in scratch.iter() {
            let segment = ctx.obstacles.segment(id);
            if segment.distance_squared(position) < config.wall_repulsion_range {
                acc += segment.normal * config.wall_repulsion_force;
            }
        }
        acc
    }

    /// Random turning.  Drifts the agent's wander value and pushes sideways
    /// relative to its heading.
    pub fn wander(
        &self,
        config:  &BehaviorConfig,
        heading: Vec2,
        wander:  &mut f32,
        rng:     &mut AgentRng,
        dt:      f32,
    ) -> Vec2 {
        if config.random_turn_force == 0.0 {
            return Vec2::ZERO;
        }
        let drift = rng.signed_unit() * config.turn_variation_speed * dt;
        *wander = (*wander + drift).clamp(-1.0, 1.0);
        heading.perp() * (*wander * config.random_turn_force)
    }

    /// Immediate velocity nudge toward the pointer target.
    #[inline]
    pub fn pointer_nudge(&self, config: &BehaviorConfig, position: Vec2, pointer: Vec2) -> Vec2 {
        direction(position, pointer) * config.mouse_attraction_force
    }

    /// Full per-agent update: rebuild acceleration, integrate velocity,
    /// renormalize to speed.
    pub fn step(
        &self,
        ctx:     &StepContext<'_>,
        input:   &SteeringInput<'_>,
        state:   SteeringState<'_>,
        rng:     &mut AgentRng,
        scratch: &mut Vec<ObstacleId>,
    ) {
        let config = input.config;
        let position = ctx.positions[input.agent.index()];

        let mut acc = self.agent_forces(ctx, input.agent, config);
        acc += self.alignment(config, &input.neighbors);
        acc += self.obstacle_forces(ctx, position, config, scratch);
        acc += self.wander(config, *state.heading, state.wander, rng, ctx.dt);
        *state.acceleration = acc;

        let mut velocity = *state.velocity + self.pointer_nudge(config, position, ctx.pointer);
        velocity += acc * ctx.dt;

        let heading = velocity.normalize_or(state.heading.normalize_or(Vec2::X));
        *state.heading = heading;
        *state.velocity = heading * config.speed;
    }
}
