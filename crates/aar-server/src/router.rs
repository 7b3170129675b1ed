//! Axum router construction for the mission API.
//!
//! Assembles all routes into a single [`Router`] with request tracing and
//! CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /missions` -- all missions
/// - `GET /missions/{mission_id}` -- single mission
/// - `GET /players/{player_id}/missions` -- a player's missions
/// - `GET /health` -- database reachability
///
/// The API is read-only, so CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/missions", get(handlers::list_missions))
        .route("/missions/{mission_id}", get(handlers::get_mission))
        .route(
            "/players/{player_id}/missions",
            get(handlers::list_player_missions),
        )
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
