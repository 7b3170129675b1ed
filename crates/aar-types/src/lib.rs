//! Shared type definitions for the after-action review (AAR) mission API.
//!
//! Types defined here are used by both the data layer and the HTTP
//! surface, and flow downstream to `TypeScript` via `ts-rs` for
//! dashboard consumers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for mission and player identifiers
//! - [`mission`] -- The [`Mission`] record returned by every endpoint

pub mod ids;
pub mod mission;

// Re-export all public types at crate root for convenience.
pub use ids::{MissionId, PlayerId};
pub use mission::Mission;
