//! Shared types for the routine workspace
//!
//! Wire models exchanged with the routine API: weekdays, routines,
//! exercises and their create/update payloads. These types are shared
//! between routine-core and routine-client.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Day, DayExercise, DayParseError, Exercise, ExerciseCreate, ExerciseUpdate, Pagination,
    Routine, RoutineCreate, RoutineDetail, RoutinePage, RoutineUpdate,
};
