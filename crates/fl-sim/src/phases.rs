//! Per-phase kernels of the tick.
//!
//! Each function is one fork-join pass over all agent slots; returning from
//! it is the barrier before the next phase.  They must be called inside the
//! simulation's rayon pool.

use rayon::prelude::*;

use fl_agent::{AgentRngs, AgentStore, NeighborAggregate};
use fl_behavior::{ForceModel, NeighborAggregator, StepContext, SteeringInput, SteeringState};
use fl_core::{AgentId, Vec2};
use fl_mobility::{Migration, PartitionTracker, integrate_position};
use fl_spatial::{GridView, ObstacleMap, SpatialGrid};

/// Phase 1: register agents that have no cell yet.  Returns how many were
/// inserted.
pub(crate) fn assign_cells(agents: &mut AgentStore, grid: &SpatialGrid<AgentId>) -> usize {
    let tracker = PartitionTracker::new(grid);
    let cols = agents.columns_mut();
    let alive = cols.alive;
    let positions: &[Vec2] = cols.positions;

    cols.cells
        .par_iter_mut()
        .enumerate()
        .map(|(i, cell)| {
            if !alive[i] {
                return Migration::Unchanged;
            }
            tracker.assign(AgentId(i as u32), positions[i], cell)
        })
        .filter(|m| m.touched_grid())
        .count()
}

/// Phase 2: advance positions and move grid entries whose cell changed.
/// Returns how many entries moved.
pub(crate) fn integrate_and_migrate(
    agents: &mut AgentStore,
    grid:   &SpatialGrid<AgentId>,
    dt:     f32,
) -> usize {
    let tracker = PartitionTracker::new(grid);
    let cols = agents.columns_mut();
    let alive = cols.alive;
    let velocities: &[Vec2] = cols.velocities;

    cols.positions
        .par_iter_mut()
        .zip(cols.cells.par_iter_mut())
        .enumerate()
        .map(|(i, (position, cell))| {
            if !alive[i] {
                return Migration::Unchanged;
            }
            integrate_position(position, velocities[i], dt);
            tracker.refresh(AgentId(i as u32), *position, cell)
        })
        .filter(|m| m.touched_grid())
        .count()
}

/// Phase 4: neighbour aggregates over the settled grid.
pub(crate) fn aggregate_neighbors(agents: &mut AgentStore, view: &GridView<'_, AgentId>) {
    let cols = agents.columns_mut();
    let alive = cols.alive;
    let configs = cols.configs;
    let positions: &[Vec2] = cols.positions;
    let aggregator = NeighborAggregator::new(view, cols.velocities);

    cols.neighbors
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, out)| {
            if alive[i] {
                let range = configs[i].neighbour_detection_range;
                aggregator.aggregate(AgentId(i as u32), positions[i], range, out);
            }
        });
}

/// Phase 5: steering.  Writes velocity, acceleration, heading and wander.
pub(crate) fn apply_forces(
    model:     ForceModel,
    agents:    &mut AgentStore,
    rngs:      &mut AgentRngs,
    view:      &GridView<'_, AgentId>,
    obstacles: &ObstacleMap,
    dt:        f32,
    pointer:   Vec2,
) {
    let cols = agents.columns_mut();
    let alive = cols.alive;
    let configs = cols.configs;
    let neighbors: &[NeighborAggregate] = cols.neighbors;
    let ctx = StepContext { dt, pointer, agents: view, positions: cols.positions, obstacles };

    cols.velocities
        .par_iter_mut()
        .zip(cols.accelerations.par_iter_mut())
        .zip(cols.headings.par_iter_mut())
        .zip(cols.wander.par_iter_mut())
        .zip(rngs.inner.par_iter_mut())
        .enumerate()
        .for_each_init(Vec::new, |scratch, (i, ((((velocity, acceleration), heading), wander), rng))| {
            if !alive[i] {
                return;
            }
            let input = SteeringInput {
                agent:     AgentId(i as u32),
                config:    &configs[i],
                neighbors: neighbors[i],
            };
            let state = SteeringState { velocity, acceleration, heading, wander };
            model.step(&ctx, &input, state, rng, scratch);
        });
}
