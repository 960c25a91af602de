use fl_core::FlockError;
use fl_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// A tick input was rejected before any state was touched.
    #[error("invalid tick input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Core(#[from] FlockError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SimResult<T> = Result<T, SimError>;
