//! Spatial-subsystem error type.

use thiserror::Error;

use fl_core::{FlockError, Vec2};

/// Errors produced by `fl-spatial`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("cell size must be finite and > 0, got {0}")]
    InvalidCellSize(f32),

    #[error("shard count must be at least 1")]
    NoShards,

    #[error("degenerate obstacle segment {start} -> {end} (normal {normal})")]
    DegenerateSegment { start: Vec2, end: Vec2, normal: Vec2 },
}

impl From<SpatialError> for FlockError {
    fn from(e: SpatialError) -> Self {
        FlockError::Config(e.to_string())
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
