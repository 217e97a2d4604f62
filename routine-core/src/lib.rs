//! Routine Core - draft reconciliation engine
//!
//! Keeps an editable draft of a routine's exercises next to the snapshot the
//! server last confirmed, maintains the per-day order invariant, computes the
//! change-set between the two and pushes it to a [`RemoteStore`].
//!
//! # Example
//!
//! ```
//! use routine_core::{DraftStore, ExerciseFields};
//! use shared::Day;
//!
//! let mut draft = DraftStore::new("Push Pull Legs", None);
//! draft
//!     .add_exercise(Day::Monday, ExerciseFields::new("Press banca", 4, 8))
//!     .unwrap();
//! assert_eq!(draft.change_set().creations.len(), 1);
//! ```

pub mod diff;
pub mod draft;
pub mod error;
pub mod memory;
pub mod ordering;
pub mod remote;
pub mod sync;
pub mod types;
pub mod validation;

pub use diff::{ChangeSet, ExerciseChange, FieldChange};
pub use draft::{DraftStore, RoutineStats};
pub use error::{CoreError, CoreResult};
pub use memory::{MemoryStore, RemoteCall};
pub use remote::{RemoteError, RemoteErrorKind, RemoteResult, RemoteStore};
pub use sync::{SubmitReport, SyncDispatcher};
pub use types::{
    DraftExercise, ExerciseFields, ExerciseId, RoutineHeader, RoutineSnapshot, TransientId,
};
pub use validation::{FieldViolation, ValidationError};
