//! Core error types.

use thiserror::Error;

/// Core error type for usage model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Usage figures that break the snapshot invariants.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
