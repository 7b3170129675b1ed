//! Read-only mission API for after-action review.
//!
//! This crate provides an Axum HTTP server that exposes missions stored in
//! `PostgreSQL`, each enriched with a `length` computed from the span of
//! its events:
//!
//! - `GET /missions` -- all missions, newest first
//! - `GET /players/{player_id}/missions` -- a player's missions
//! - `GET /missions/{mission_id}` -- one mission
//! - `GET /health` -- database reachability
//!
//! # Architecture
//!
//! Handlers read through the [`MissionSource`](aar_db::MissionSource)
//! held in [`AppState`]. List endpoints stream rows straight from the
//! database cursor into the response body (see [`stream`]), so memory use
//! does not grow with the result set. Each request is independent; the
//! connection pool is the only shared resource, and dropping a response
//! (client disconnect) drops the underlying query.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod stream;

// Re-export primary types for convenience.
pub use config::{ConfigError, LogFormat, LoggingConfig, ServiceConfig};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
