//! Data models
//!
//! Shared between routine-core and routine-client (via API).
//! Field names follow the remote API's wire format; Rust-side names are English.
//! Persisted IDs are `i64` (SQL INTEGER PRIMARY KEY).

pub mod day;
pub mod exercise;
pub mod routine;

// Re-exports
pub use day::*;
pub use exercise::*;
pub use routine::*;
