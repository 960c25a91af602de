//! Small per-agent value types.

use fl_core::{ConfigHandle, FlockError, FlockResult, Vec2};

/// Summary of the agents found around one agent this tick.
///
/// Recomputed every tick before forces are evaluated.  When nothing was
/// found, `count` is zero and `average_velocity` keeps its previous value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborAggregate {
    pub average_velocity: Vec2,
    pub count:            u32,
}

impl NeighborAggregate {
    /// `true` if at least one neighbour contributed this tick.
    #[inline]
    pub fn has_neighbors(&self) -> bool {
        self.count > 0
    }
}

/// Everything needed to create one agent.
#[derive(Clone, Debug)]
pub struct SpawnRequest {
    /// World position in the simulation plane.
    pub position:      Vec2,
    /// Initial heading, radians from +x.  Initial velocity is the unit
    /// vector at this angle.
    pub heading_angle: f32,
    /// Presentation scale, passed through untouched.
    pub display_scale: f32,
    pub config:        ConfigHandle,
    /// Whether player mode switches apply to this agent.
    pub controllable:  bool,
}

impl SpawnRequest {
    pub fn new(position: Vec2, heading_angle: f32, config: ConfigHandle) -> Self {
        Self {
            position,
            heading_angle,
            display_scale: 1.0,
            config,
            controllable: true,
        }
    }

    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale;
        self
    }

    pub fn with_controllable(mut self, controllable: bool) -> Self {
        self.controllable = controllable;
        self
    }

    /// Reject requests that would put non-finite values into the store.
    pub fn validate(&self) -> FlockResult<()> {
        if !self.position.is_finite() {
            return Err(FlockError::Config(format!(
                "spawn position must be finite, got {}",
                self.position
            )));
        }
        if !self.heading_angle.is_finite() {
            return Err(FlockError::Config(format!(
                "spawn heading must be finite, got {}",
                self.heading_angle
            )));
        }
        if !self.display_scale.is_finite() {
            return Err(FlockError::Config(format!(
                "display scale must be finite, got {}",
                self.display_scale
            )));
        }
        self.config.validate()
    }
}
