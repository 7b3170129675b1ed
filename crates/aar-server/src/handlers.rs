//! REST API endpoint handlers.
//!
//! Each handler extracts its path parameter, runs one mission query
//! through the shared [`MissionSource`](aar_db::MissionSource), and writes
//! the result. Any failure becomes the generic 500 of [`ApiError`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/missions` | All missions, newest first |
//! | `GET` | `/missions/{mission_id}` | Single mission |
//! | `GET` | `/players/{player_id}/missions` | Missions a player took part in, newest first |
//! | `GET` | `/health` | Database reachability |

use std::sync::Arc;

use aar_db::MissionQuery;
use aar_types::{Mission, MissionId, PlayerId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::AppState;
use crate::stream;

// ---------------------------------------------------------------------------
// GET /missions -- all missions
// ---------------------------------------------------------------------------

/// Stream every mission as a JSON array, newest first.
pub async fn list_missions(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    stream_missions(&state, MissionQuery::All).await
}

// ---------------------------------------------------------------------------
// GET /players/{player_id}/missions -- missions for one player
// ---------------------------------------------------------------------------

/// Stream the missions in which the player appears in at least one event.
pub async fn list_player_missions(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Response, ApiError> {
    stream_missions(&state, MissionQuery::ForPlayer(PlayerId::from(player_id))).await
}

// ---------------------------------------------------------------------------
// GET /missions/{mission_id} -- single mission
// ---------------------------------------------------------------------------

/// Return a single mission as a JSON object.
///
/// An unknown or malformed id fails like any other lookup error.
pub async fn get_mission(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<Mission>, ApiError> {
    let id = parse_mission_id(&id_str)?;
    let mission = state.missions.mission(id).await?;
    Ok(Json(mission))
}

// ---------------------------------------------------------------------------
// GET /health -- database reachability
// ---------------------------------------------------------------------------

/// Report whether the database answers.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.missions.ping().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "database": "connected",
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn stream_missions(state: &AppState, query: MissionQuery) -> Result<Response, ApiError> {
    let label = query.label();
    let primed = stream::prime(state.missions.missions(query)).await?;
    tracing::debug!(query = label, empty = primed.is_empty(), "Streaming missions");

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        stream::json_array_body(primed),
    )
        .into_response())
}

fn parse_mission_id(s: &str) -> Result<MissionId, ApiError> {
    s.parse::<MissionId>().map_err(|source| ApiError::InvalidMissionId {
        raw: s.to_owned(),
        source,
    })
}
