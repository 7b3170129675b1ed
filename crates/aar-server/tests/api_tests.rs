//! Integration tests for the mission API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, against an in-memory [`MissionSource`] that
//! replays scripted rows. This validates routing, streaming, and error
//! handling without a live database.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeMap;
use std::sync::Arc;

use aar_db::{DbError, MissionQuery, MissionSource, MissionStream};
use aar_server::router::build_router;
use aar_server::state::AppState;
use aar_types::{Mission, MissionId};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, stream};
use serde_json::Value;
use tower::ServiceExt;

// =========================================================================
// In-memory mission source
// =========================================================================

/// One scripted row of a list query.
#[derive(Clone)]
enum Row {
    Mission(Mission),
    Undecodable,
    ConnectionLost,
}

#[derive(Clone, Default)]
struct FakeSource {
    /// Rows returned by the all-missions query, in order.
    all: Vec<Row>,
    /// Rows returned per player id.
    by_player: BTreeMap<String, Vec<Row>>,
    /// Every list query fails before producing a row.
    query_fails: bool,
    /// Health checks fail.
    unreachable: bool,
}

impl FakeSource {
    fn replay(rows: &[Row]) -> MissionStream {
        let items: Vec<Result<Mission, DbError>> = rows
            .iter()
            .map(|row| match row {
                Row::Mission(m) => Ok(m.clone()),
                Row::Undecodable => Err(DbError::RowDecode(sqlx::Error::ColumnNotFound(
                    String::from("world"),
                ))),
                Row::ConnectionLost => Err(DbError::Postgres(sqlx::Error::PoolClosed)),
            })
            .collect();
        stream::iter(items).boxed()
    }
}

impl MissionSource for FakeSource {
    fn missions(&self, query: MissionQuery) -> MissionStream {
        if self.query_fails {
            return Self::replay(&[Row::ConnectionLost]);
        }
        match query {
            MissionQuery::All => Self::replay(&self.all),
            MissionQuery::ForPlayer(player) => Self::replay(
                self.by_player
                    .get(player.as_str())
                    .map_or(&[][..], Vec::as_slice),
            ),
        }
    }

    fn mission(&self, id: MissionId) -> BoxFuture<'_, Result<Mission, DbError>> {
        let found = self.all.iter().find_map(|row| match row {
            Row::Mission(m) if m.id == id => Some(m.clone()),
            _ => None,
        });
        let result = if self.query_fails {
            Err(DbError::Postgres(sqlx::Error::PoolTimedOut))
        } else {
            found.ok_or(DbError::Postgres(sqlx::Error::RowNotFound))
        };
        async move { result }.boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), DbError>> {
        let result = if self.unreachable {
            Err(DbError::Postgres(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        };
        async move { result }.boxed()
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
}

fn mission(name: &str, created_at: DateTime<Utc>, length: Option<i64>) -> Mission {
    Mission {
        id: MissionId::new(),
        created_at,
        length,
        name: name.to_owned(),
        world: String::from("W1"),
    }
}

/// Two missions: "Run1" (events 60 s apart) and a newer one with no events.
fn sample_source() -> (FakeSource, Mission, Mission) {
    let t = base_time();
    let newer = mission("Run2", t + Duration::hours(1), None);
    let older = mission("Run1", t, Some(60));

    let mut by_player = BTreeMap::new();
    by_player.insert(String::from("p1"), vec![Row::Mission(older.clone())]);

    let source = FakeSource {
        all: vec![Row::Mission(newer.clone()), Row::Mission(older.clone())],
        by_player,
        ..FakeSource::default()
    };
    (source, newer, older)
}

fn router_for(source: FakeSource) -> axum::Router {
    build_router(Arc::new(AppState::new(Arc::new(source))))
}

async fn get(router: axum::Router, path: &str) -> (StatusCode, String, Option<String>) {
    let response = router
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

fn assert_generic_error(status: StatusCode, body: &str) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["error"], "Internal Server Error");
    assert_eq!(json["status"], 500);
}

// =========================================================================
// GET /missions
// =========================================================================

#[tokio::test]
async fn test_list_missions_streams_array() {
    let (source, newer, older) = sample_source();
    let (status, body, content_type) = get(router_for(source), "/missions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let json: Value = serde_json::from_str(&body).unwrap();
    let missions = json.as_array().unwrap();
    assert_eq!(missions.len(), 2);
    assert_eq!(missions[0]["id"], newer.id.to_string());
    assert!(missions[0]["length"].is_null());
    assert_eq!(missions[1]["id"], older.id.to_string());
    assert_eq!(missions[1]["name"], "Run1");
    assert_eq!(missions[1]["world"], "W1");
    assert_eq!(missions[1]["length"], 60);
    assert_eq!(missions[1]["created_at"], "2024-06-01T20:00:00Z");
}

#[tokio::test]
async fn test_list_missions_empty() {
    let (status, body, _) = get(router_for(FakeSource::default()), "/missions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_list_missions_skips_undecodable_rows() {
    let (mut source, _, _) = sample_source();
    source.all.insert(0, Row::Undecodable);
    source.all.insert(2, Row::Undecodable);
    source.all.push(Row::Undecodable);

    let (status, body, _) = get(router_for(source), "/missions").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_missions_query_failure_is_generic_500() {
    let source = FakeSource {
        query_fails: true,
        ..FakeSource::default()
    };
    let (status, body, _) = get(router_for(source), "/missions").await;
    assert_generic_error(status, &body);
    assert!(!body.contains("pool"));
}

#[tokio::test]
async fn test_list_missions_connection_lost_mid_stream_keeps_valid_json() {
    let (mut source, newer, _) = sample_source();
    source.all.insert(1, Row::ConnectionLost);

    let (status, body, _) = get(router_for(source), "/missions").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    let missions = json.as_array().unwrap();
    assert_eq!(missions.len(), 1);
    assert_eq!(missions[0]["id"], newer.id.to_string());
}

// =========================================================================
// GET /players/{player_id}/missions
// =========================================================================

#[tokio::test]
async fn test_player_missions() {
    let (source, _, older) = sample_source();
    let (status, body, content_type) = get(router_for(source), "/players/p1/missions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_str(&body).unwrap();
    let missions = json.as_array().unwrap();
    assert_eq!(missions.len(), 1);
    assert_eq!(missions[0]["id"], older.id.to_string());
}

#[tokio::test]
async fn test_unknown_player_has_no_missions() {
    let (source, _, _) = sample_source();
    let (status, body, _) = get(router_for(source), "/players/nobody/missions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_player_missions_query_failure_is_generic_500() {
    let source = FakeSource {
        query_fails: true,
        ..FakeSource::default()
    };
    let (status, body, _) = get(router_for(source), "/players/p1/missions").await;
    assert_generic_error(status, &body);
}

// =========================================================================
// GET /missions/{mission_id}
// =========================================================================

#[tokio::test]
async fn test_get_mission_by_id() {
    let (source, _, older) = sample_source();
    let path = format!("/missions/{}", older.id);
    let (status, body, content_type) = get(router_for(source), &path).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json.is_object());
    let decoded: Mission = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, older);
}

#[tokio::test]
async fn test_get_mission_not_found_is_generic_500() {
    let (source, _, _) = sample_source();
    let path = format!("/missions/{}", MissionId::new());
    let (status, body, _) = get(router_for(source), &path).await;
    assert_generic_error(status, &body);
}

#[tokio::test]
async fn test_get_mission_malformed_id_is_generic_500() {
    let (source, _, _) = sample_source();
    let (status, body, _) = get(router_for(source), "/missions/not-a-uuid").await;
    assert_generic_error(status, &body);
}

#[tokio::test]
async fn test_get_mission_database_failure_is_generic_500() {
    let (mut source, _, older) = sample_source();
    source.query_fails = true;
    let path = format!("/missions/{}", older.id);
    let (status, body, _) = get(router_for(source), &path).await;
    assert_generic_error(status, &body);
}

// =========================================================================
// GET /health
// =========================================================================

#[tokio::test]
async fn test_health_ok() {
    let (status, body, _) = get(router_for(FakeSource::default()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn test_health_unreachable_database() {
    let source = FakeSource {
        unreachable: true,
        ..FakeSource::default()
    };
    let (status, body, _) = get(router_for(source), "/health").await;
    assert_generic_error(status, &body);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _, _) = get(router_for(FakeSource::default()), "/api/agents").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
