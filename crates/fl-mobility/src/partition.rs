//! Cell-membership tracking for agents in a [`SpatialGrid`].
//!
//! The tracker is the only writer of the agent grid.  It keeps one
//! invariant: an agent whose recorded cell is `Some(c)` has exactly one grid
//! entry, in bucket `c`.

use fl_core::{AgentId, CellCoord, Vec2};
use fl_spatial::SpatialGrid;

/// Outcome of one tracker call for one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Migration {
    /// The recorded cell already matched; the grid was not touched.
    Unchanged,
    /// The agent had no cell and was inserted.
    Inserted(CellCoord),
    /// The agent's entry moved between buckets.
    Moved { from: CellCoord, to: CellCoord },
}

impl Migration {
    /// `true` unless the grid was left untouched.
    #[inline]
    pub fn touched_grid(self) -> bool {
        !matches!(self, Migration::Unchanged)
    }
}

/// Keeps agents' recorded cells and grid entries consistent.
///
/// Borrows the grid shared, so one tracker can be used from every worker of
/// a phase at once.
#[derive(Copy, Clone)]
pub struct PartitionTracker<'g> {
    grid: &'g SpatialGrid<AgentId>,
}

impl<'g> PartitionTracker<'g> {
    pub fn new(grid: &'g SpatialGrid<AgentId>) -> Self {
        Self { grid }
    }

    #[inline]
    pub fn cell_of(&self, position: Vec2) -> CellCoord {
        self.grid.cell_of(position)
    }

    /// Register an agent that has no cell yet.  Agents that already have one
    /// are left alone, so calling this for every agent is safe.
    pub fn assign(&self, agent: AgentId, position: Vec2, cell: &mut Option<CellCoord>) -> Migration {
        if cell.is_some() {
            return Migration::Unchanged;
        }
        let to = self.cell_of(position);
        self.grid.insert(to, agent);
        *cell = Some(to);
        Migration::Inserted(to)
    }

    /// Bring an agent's grid entry in line with its current position.
    ///
    /// Moves the entry if the position now falls in a different cell.  An
    /// agent with no cell is inserted directly, without a removal step.
    pub fn refresh(&self, agent: AgentId, position: Vec2, cell: &mut Option<CellCoord>) -> Migration {
        let Some(from) = *cell else {
            return self.assign(agent, position, cell);
        };
        let to = self.cell_of(position);
        if to == from {
            return Migration::Unchanged;
        }
        self.grid.relocate(from, to, agent);
        *cell = Some(to);
        Migration::Moved { from, to }
    }

    /// Drop an agent's entry (despawn).  Unknown entries are a no-op;
    /// returns whether an entry was removed.
    pub fn evict(&self, agent: AgentId, cell: CellCoord) -> bool {
        self.grid.remove(cell, agent)
    }
}
