//! Alignment input: the average velocity of nearby agents.

use fl_agent::NeighborAggregate;
use fl_core::{AgentId, CellCoord, Vec2};
use fl_spatial::GridView;

/// Scans the cells around an agent and averages the velocities found there.
///
/// The scan covers the cell rectangle bounding a square of half-width
/// `neighbour_detection_range`; there is no exact distance filter, so any
/// agent in those cells counts.
#[derive(Copy, Clone)]
pub struct NeighborAggregator<'a> {
    grid:       &'a GridView<'a, AgentId>,
    velocities: &'a [Vec2],
}

impl<'a> NeighborAggregator<'a> {
    pub fn new(grid: &'a GridView<'a, AgentId>, velocities: &'a [Vec2]) -> Self {
        Self { grid, velocities }
    }

    /// Recompute `out` for `agent` at `position`.
    ///
    /// With no neighbours `out.count` becomes zero and `out.average_velocity`
    /// is left as it was.
    pub fn aggregate(
        &self,
        agent:           AgentId,
        position:        Vec2,
        detection_range: f32,
        out:             &mut NeighborAggregate,
    ) {
        let (min, max) = CellCoord::range_around(position, detection_range, self.grid.cell_size());

        let mut sum = Vec2::ZERO;
        let mut count = 0u32;
        for other in self.grid.query_range(min, max) {
            if other == agent {
                continue;
            }
            sum += self.velocities[other.index()];
            count += 1;
        }

        if count > 0 {
            out.average_velocity = sum / count as f32;
        }
        out.count = count;
    }
}
