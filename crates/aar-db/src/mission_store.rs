//! Read-only mission queries.
//!
//! Every query computes `length` the same way: one correlated sub-query
//! takes the latest event timestamp of the mission, another the earliest,
//! and the difference is truncated to whole seconds. A mission without
//! events has no latest timestamp, so `length` is `NULL`; a mission with a
//! single event has a `length` of 0.
//!
//! List queries are read lazily with [`sqlx::query`] + `fetch`, so the
//! result set is never materialized in memory. Rows are decoded one at a
//! time and a row that fails to decode is reported as
//! [`DbError::RowDecode`] without ending the stream.

use aar_types::{Mission, MissionId, PlayerId};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::BoxStream;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::error::DbError;

/// Column list shared by every mission query.
macro_rules! mission_columns {
    () => {
        r"missions.id,
          missions.created_at,
          TRUNC(EXTRACT(EPOCH FROM (
              (SELECT MAX(events.timestamp) FROM events WHERE events.mission_id = missions.id)
            - (SELECT MIN(events.timestamp) FROM events WHERE events.mission_id = missions.id)
          )))::BIGINT AS length,
          missions.name,
          missions.world"
    };
}

/// Every mission, newest first.
const ALL_MISSIONS_SQL: &str = concat!(
    "SELECT ",
    mission_columns!(),
    r"
     FROM missions
     ORDER BY missions.created_at DESC, missions.id DESC"
);

/// Missions with at least one event whose payload names the player.
const PLAYER_MISSIONS_SQL: &str = concat!(
    "SELECT ",
    mission_columns!(),
    r"
     FROM events
     INNER JOIN missions ON missions.id = events.mission_id
     WHERE events.data #>> '{player,uid}' = $1
     GROUP BY missions.id
     ORDER BY missions.created_at DESC, missions.id DESC"
);

/// A single mission by primary key.
const MISSION_SQL: &str = concat!(
    "SELECT ",
    mission_columns!(),
    r"
     FROM missions
     WHERE missions.id = $1"
);

/// Lazily-read stream of missions.
///
/// Items are yielded in query order. A [`DbError::RowDecode`] item stands
/// for one skipped row; any other error is the last item of the stream.
pub type MissionStream = BoxStream<'static, Result<Mission, DbError>>;

/// The multi-row query shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionQuery {
    /// All missions, newest first.
    All,
    /// Missions the given player took part in, newest first.
    ForPlayer(PlayerId),
}

impl MissionQuery {
    /// The SQL text issued for this shape.
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::All => ALL_MISSIONS_SQL,
            Self::ForPlayer(_) => PLAYER_MISSIONS_SQL,
        }
    }

    /// Short label used in log fields.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ForPlayer(_) => "player",
        }
    }

    fn build(&self) -> Query<'_, Postgres, PgArguments> {
        let query = sqlx::query(self.sql());
        match self {
            Self::All => query,
            Self::ForPlayer(player) => query.bind(player.as_str()),
        }
    }
}

/// A row from one of the mission queries.
///
/// Uses runtime types rather than compile-time checked types to
/// avoid requiring a live database during builds.
#[derive(Debug, Clone, FromRow)]
pub struct MissionRow {
    /// Mission primary key.
    pub id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Computed span between first and last event, in seconds.
    pub length: Option<i64>,
    /// Mission name.
    pub name: String,
    /// Game world name.
    pub world: String,
}

impl From<MissionRow> for Mission {
    fn from(row: MissionRow) -> Self {
        Self {
            id: MissionId::from(row.id),
            created_at: row.created_at,
            length: row.length,
            name: row.name,
            world: row.world,
        }
    }
}

fn decode(row: &PgRow) -> Result<Mission, DbError> {
    MissionRow::from_row(row)
        .map(Mission::from)
        .map_err(DbError::RowDecode)
}

/// Operations on the `missions` table (joined with `events`).
#[derive(Clone)]
pub struct MissionStore {
    pool: PgPool,
}

impl MissionStore {
    /// Create a new mission store bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stream the missions selected by `query`.
    ///
    /// The query is sent when the stream is first polled. Dropping the
    /// stream releases the connection and abandons the remaining rows.
    pub fn stream_missions(&self, query: MissionQuery) -> MissionStream {
        let pool = self.pool.clone();

        Box::pin(async_stream::stream! {
            tracing::debug!(query = query.label(), "Querying missions");
            let mut rows = query.build().fetch(&pool);
            let mut fetched: u64 = 0;

            while let Some(row) = rows.next().await {
                match row {
                    Ok(row) => {
                        fetched = fetched.saturating_add(1);
                        yield decode(&row);
                    }
                    Err(e) => {
                        yield Err(DbError::Postgres(e));
                        break;
                    }
                }
            }

            tracing::debug!(query = query.label(), fetched, "Mission rows exhausted");
        })
    }

    /// Fetch exactly one mission by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] wrapping [`sqlx::Error::RowNotFound`]
    /// when no mission has this id, [`DbError::RowDecode`] if the row
    /// cannot be decoded, and [`DbError::Postgres`] for any other failure.
    pub async fn fetch_mission(&self, id: MissionId) -> Result<Mission, DbError> {
        let row = sqlx::query(MISSION_SQL)
            .bind(id.into_inner())
            .fetch_one(&self.pool)
            .await?;

        decode(&row)
    }

    /// Round-trip a trivial query to confirm the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
