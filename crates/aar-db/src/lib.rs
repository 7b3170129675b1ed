//! `PostgreSQL` data layer for the after-action review mission API.
//!
//! Missions and their events are written by other services; this crate
//! only reads them, deriving each mission's `length` from the span of its
//! events at query time.
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool and configuration
//! - [`mission_store`] -- The three mission queries and row decoding
//! - [`source`] -- [`MissionSource`], the trait the HTTP layer consumes
//! - [`error`] -- Shared error types

pub mod error;
pub mod mission_store;
pub mod postgres;
pub mod source;

// Re-export primary types for convenience.
pub use error::DbError;
pub use mission_store::{MissionQuery, MissionRow, MissionStore, MissionStream};
pub use postgres::{PostgresConfig, PostgresPool};
pub use source::MissionSource;
