//! Remote persistence seam
//!
//! The sync dispatcher only talks to the server through [`RemoteStore`]; the
//! HTTP client implements it in `routine-client`, [`crate::MemoryStore`]
//! implements it for tests and offline use.

use async_trait::async_trait;
use shared::{
    Exercise, ExerciseCreate, ExerciseUpdate, Routine, RoutineCreate, RoutineDetail,
    RoutineUpdate,
};
use std::fmt;
use thiserror::Error;

/// Failure category of a remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    /// Request never produced a response (connection, timeout)
    Transport,
    /// Target routine or exercise does not exist remotely
    NotFound,
    /// Server refused the payload (duplicate name, bad field)
    Rejected,
    /// Missing or invalid credentials
    Unauthorized,
    /// Server-side failure
    Server,
    /// Response body could not be understood
    InvalidResponse,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Transport => "transport",
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
            Self::Unauthorized => "unauthorized",
            Self::Server => "server",
            Self::InvalidResponse => "invalid_response",
        };
        f.write_str(s)
    }
}

/// Error reported by a [`RemoteStore`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Transport, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::NotFound, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Rejected, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Server, message)
    }

    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, RemoteErrorKind::Transport | RemoteErrorKind::Server)
    }
}

/// Result type for remote calls
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote routine/exercise persistence
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn create_routine(&self, payload: &RoutineCreate) -> RemoteResult<Routine>;

    /// Every routine header, without exercises
    async fn list_routines(&self) -> RemoteResult<Vec<Routine>>;

    /// Routines whose name contains `name` (case-insensitive)
    async fn search_routines(&self, name: &str) -> RemoteResult<Vec<Routine>>;

    async fn update_routine(&self, id: i64, payload: &RoutineUpdate) -> RemoteResult<Routine>;

    /// Delete a routine and all of its exercises
    async fn delete_routine(&self, id: i64) -> RemoteResult<()>;

    /// Routine header plus its exercises grouped by day label
    async fn get_routine_detail(&self, id: i64) -> RemoteResult<RoutineDetail>;

    async fn create_exercise(&self, payload: &ExerciseCreate) -> RemoteResult<Exercise>;

    async fn update_exercise(&self, id: i64, payload: &ExerciseUpdate) -> RemoteResult<Exercise>;

    async fn delete_exercise(&self, id: i64) -> RemoteResult<()>;
}
