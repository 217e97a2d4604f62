//! Core error types

use crate::remote::RemoteError;
use crate::types::ExerciseId;
use crate::validation::ValidationError;
use thiserror::Error;

/// Core error type
///
/// Every variant except [`CoreError::Remote`] is raised locally, before any
/// remote call, and leaves the draft untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Field input rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operation targets an identity absent from the draft
    #[error("Exercise not found: {0}")]
    NotFound(ExerciseId),

    /// Snapshot could not be turned into a draft
    #[error("Malformed routine: {0}")]
    Load(String),

    /// Ordering is not a permutation of the day's exercises
    #[error("Reorder rejected: {0}")]
    ReorderRejected(String),

    /// Remote sync requested for a routine that was never created
    #[error("Routine has not been saved yet")]
    NotPersisted,

    /// Persistence collaborator failed
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl CoreError {
    /// Whether this error was raised without touching the network
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Remote(_))
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
