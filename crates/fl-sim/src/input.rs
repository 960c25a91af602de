//! Per-tick input and per-agent output.

use fl_agent::SpawnRequest;
use fl_core::{AgentId, ConfigHandle, Vec2};

use crate::{SimError, SimResult};

/// Everything the outside world feeds into one tick.
///
/// `dt` and `pointer` are captured once and held constant for every phase
/// of the tick.  Despawns are applied first, then config swaps, then spawns.
#[derive(Clone, Debug)]
pub struct TickInput {
    pub dt:             f32,
    /// Pointer target in world space.
    pub pointer:        Vec2,
    pub config_changes: Vec<(AgentId, ConfigHandle)>,
    pub spawns:         Vec<SpawnRequest>,
    pub despawns:       Vec<AgentId>,
}

impl TickInput {
    /// A tick with no lifecycle changes.
    pub fn new(dt: f32, pointer: Vec2) -> Self {
        Self {
            dt,
            pointer,
            config_changes: Vec::new(),
            spawns:         Vec::new(),
            despawns:       Vec::new(),
        }
    }

    pub fn with_spawns(mut self, spawns: impl IntoIterator<Item = SpawnRequest>) -> Self {
        self.spawns.extend(spawns);
        self
    }

    pub fn with_despawns(mut self, despawns: impl IntoIterator<Item = AgentId>) -> Self {
        self.despawns.extend(despawns);
        self
    }

    pub fn with_config_changes(
        mut self,
        changes: impl IntoIterator<Item = (AgentId, ConfigHandle)>,
    ) -> Self {
        self.config_changes.extend(changes);
        self
    }

    /// Fold another patch (e.g. from the action controller or spawner) into
    /// this one.
    pub fn merge(&mut self, other: TickPatch) {
        self.config_changes.extend(other.config_changes);
        self.spawns.extend(other.spawns);
    }

    /// Check every field without side effects.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidInput(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        if !self.pointer.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "pointer must be finite, got {}",
                self.pointer
            )));
        }
        for (agent, config) in &self.config_changes {
            config
                .validate()
                .map_err(|e| SimError::InvalidInput(format!("config change for {agent}: {e}")))?;
        }
        for (i, req) in self.spawns.iter().enumerate() {
            req.validate()
                .map_err(|e| SimError::InvalidInput(format!("spawn #{i}: {e}")))?;
        }
        Ok(())
    }
}

/// Config swaps and spawns produced by a collaborator for the next tick.
#[derive(Clone, Debug, Default)]
pub struct TickPatch {
    pub config_changes: Vec<(AgentId, ConfigHandle)>,
    pub spawns:         Vec<SpawnRequest>,
}

impl TickPatch {
    pub fn is_empty(&self) -> bool {
        self.config_changes.is_empty() && self.spawns.is_empty()
    }
}

/// Presentation output for one live agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentFrame {
    pub id:            AgentId,
    pub position:      Vec2,
    pub velocity:      Vec2,
    pub display_scale: f32,
}
