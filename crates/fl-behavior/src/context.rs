//! Read-only simulation state passed to every force evaluation.

use fl_core::{AgentId, Vec2};
use fl_spatial::{GridView, ObstacleMap};

/// A read-only snapshot shared (immutably) by every worker of the force
/// phase.
///
/// # Lifetimes
///
/// All borrows live for the duration of one phase.  The grid view can only
/// exist while the agent grid is exclusively borrowed, so no partition
/// update can run concurrently with a live context.
pub struct StepContext<'a> {
    /// Seconds covered by this tick.
    pub dt: f32,

    /// Pointer target in world space, captured once for the whole tick.
    pub pointer: Vec2,

    /// Settled agent grid.
    pub agents: &'a GridView<'a, AgentId>,

    /// Positions of every agent slot, already advanced this tick.
    pub positions: &'a [Vec2],

    /// Static obstacle segments and their grid.
    pub obstacles: &'a ObstacleMap,
}
