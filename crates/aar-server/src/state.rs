//! Shared application state for the mission API.

use std::sync::Arc;

use aar_db::MissionSource;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. Requests
/// share nothing but the mission source, which in production is a
/// [`MissionStore`](aar_db::MissionStore) over the connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Where missions are read from.
    pub missions: Arc<dyn MissionSource>,
}

impl AppState {
    /// Create application state around a mission source.
    pub fn new(missions: Arc<dyn MissionSource>) -> Self {
        Self { missions }
    }
}
