//! Core error type.
//!
//! Sub-crates define their own error enums and convert `FlockError` into
//! them via `From` impls, so `?` works across crate boundaries.

use thiserror::Error;

/// The top-level error type for `fl-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlockError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `fl-*` crates.
pub type FlockResult<T> = Result<T, FlockError>;
