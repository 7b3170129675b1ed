//! The mission record served by every endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::MissionId;

/// A play session, enriched with its duration derived from recorded events.
///
/// `length` is the span in whole seconds between the earliest and the
/// latest event tied to the mission. It is `None` (serialized as `null`,
/// never omitted) when the mission has no events, and `0` when it has
/// exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mission {
    /// Unique mission identifier.
    pub id: MissionId,
    /// When the mission record was created.
    pub created_at: DateTime<Utc>,
    /// Seconds between the first and last event of the mission.
    #[ts(type = "number | null")]
    pub length: Option<i64>,
    /// Human-readable mission name.
    pub name: String,
    /// Game world or server instance the mission ran on.
    pub world: String,
}
