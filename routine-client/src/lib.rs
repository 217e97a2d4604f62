//! Routine Client - HTTP adapter for the routines API
//!
//! Implements [`routine_core::RemoteStore`] over the JSON API so the sync
//! dispatcher can run against a real server.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
