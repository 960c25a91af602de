//! Per-agent behavior tuning.
//!
//! A `BehaviorConfig` is immutable once built.  Many agents share one
//! instance through a [`ConfigHandle`]; a mode switch replaces an agent's
//! handle wholesale and never edits the shared value in place.
//!
//! # Range units
//!
//! `attraction_range`, `repulsion_range` and `wall_repulsion_range` are
//! compared against **squared** distances.  `neighbour_detection_range` is a
//! plain radius in world units.

use std::sync::Arc;

use crate::{FlockError, FlockResult};

/// Largest query half-width, in grid cells, a behavior may ask for.
///
/// Range queries visit every cell of their square, so each agent pays for
/// `(2 * n + 1)^2` lookups per tick whether the cells are occupied or not.
pub const MAX_QUERY_RADIUS_CELLS: f32 = 32.0;

/// Half-width of the square that must be scanned to find everything within
/// a squared-distance `threshold`.
///
/// Covers both readings of a range value (as a radius and as a squared
/// radius), so thresholds below 1 are not under-scanned.
#[inline]
pub fn query_reach(threshold: f32) -> f32 {
    threshold.max(threshold.sqrt())
}

/// Shared, immutable handle to a behavior config.
pub type ConfigHandle = Arc<BehaviorConfig>;

/// Tunable scalars driving one agent's steering.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorConfig {
    /// Display radius.  Presentation hint only.
    pub radius: f32,
    /// Constant movement speed; velocity is renormalized to this every tick.
    pub speed: f32,

    /// Strength of the random wander term.  Zero disables wandering.
    pub random_turn_force: f32,
    /// How fast the wander value drifts, per second.
    pub turn_variation_speed: f32,

    pub attraction_force: f32,
    /// Squared-distance threshold for attraction.
    pub attraction_range: f32,
    pub repulsion_force: f32,
    /// Squared-distance threshold for repulsion.
    pub repulsion_range: f32,

    /// Radius scanned for alignment neighbours.
    pub neighbour_detection_range: f32,
    pub align_force: f32,

    /// Velocity nudge toward the pointer target, applied every tick.
    pub mouse_attraction_force: f32,

    /// Squared-distance threshold for obstacle repulsion.
    pub wall_repulsion_range: f32,
    pub wall_repulsion_force: f32,

    /// RGBA display colour.  Presentation hint only.
    pub color: [f32; 4],
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            radius:                    0.25,
            speed:                     4.0,
            random_turn_force:         0.0,
            turn_variation_speed:      1.0,
            attraction_force:          1.0,
            attraction_range:          4.0,
            repulsion_force:           3.0,
            repulsion_range:           0.5,
            neighbour_detection_range: 2.0,
            align_force:               1.5,
            mouse_attraction_force:    0.0,
            wall_repulsion_range:      1.0,
            wall_repulsion_force:      20.0,
            color:                     [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl BehaviorConfig {
    /// Wrap in a shareable handle.
    pub fn into_handle(self) -> ConfigHandle {
        Arc::new(self)
    }

    /// Reject values the simulation cannot run with.
    ///
    /// Forces may be negative (an inverted force is a legitimate tuning), but
    /// every value must be finite, speed and ranges must be non-negative, and
    /// the neighbour detection range must be positive.
    pub fn validate(&self) -> FlockResult<()> {
        let scalars = [
            ("radius", self.radius),
            ("speed", self.speed),
            ("random_turn_force", self.random_turn_force),
            ("turn_variation_speed", self.turn_variation_speed),
            ("attraction_force", self.attraction_force),
            ("attraction_range", self.attraction_range),
            ("repulsion_force", self.repulsion_force),
            ("repulsion_range", self.repulsion_range),
            ("neighbour_detection_range", self.neighbour_detection_range),
            ("align_force", self.align_force),
            ("mouse_attraction_force", self.mouse_attraction_force),
            ("wall_repulsion_range", self.wall_repulsion_range),
            ("wall_repulsion_force", self.wall_repulsion_force),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(FlockError::Config(format!("{name} must be finite, got {value}")));
            }
        }

        let non_negative = [
            ("speed", self.speed),
            ("attraction_range", self.attraction_range),
            ("repulsion_range", self.repulsion_range),
            ("wall_repulsion_range", self.wall_repulsion_range),
            ("turn_variation_speed", self.turn_variation_speed),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(FlockError::Config(format!("{name} must be >= 0, got {value}")));
            }
        }

        if self.neighbour_detection_range <= 0.0 {
            return Err(FlockError::Config(format!(
                "neighbour_detection_range must be > 0, got {}",
                self.neighbour_detection_range
            )));
        }
        Ok(())
    }

    /// Reject ranges whose grid queries would span more than
    /// [`MAX_QUERY_RADIUS_CELLS`] cells on either side of the agent.
    pub fn check_query_extent(&self, agent_cell_size: f32, obstacle_cell_size: f32) -> FlockResult<()> {
        let extents = [
            ("neighbour_detection_range", self.neighbour_detection_range, agent_cell_size),
            (
                "attraction_range/repulsion_range",
                query_reach(self.attraction_range.max(self.repulsion_range)),
                agent_cell_size,
            ),
            ("wall_repulsion_range", query_reach(self.wall_repulsion_range), obstacle_cell_size),
        ];
        for (name, reach, cell_size) in extents {
            let cells = reach / cell_size;
            if cells.is_nan() || cells > MAX_QUERY_RADIUS_CELLS {
                return Err(FlockError::Config(format!(
                    "{name} reaches {cells} cells of size {cell_size}, limit is {MAX_QUERY_RADIUS_CELLS}"
                )));
            }
        }
        Ok(())
    }
}
