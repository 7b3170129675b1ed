//! The seam between the HTTP layer and storage.
//!
//! Handlers depend on [`MissionSource`] rather than on a concrete pool so
//! the router can be exercised against an in-memory source in tests.

use aar_types::{Mission, MissionId};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::DbError;
use crate::mission_store::{MissionQuery, MissionStore, MissionStream};

/// Read access to missions.
pub trait MissionSource: Send + Sync {
    /// Stream the missions selected by `query`, in query order.
    fn missions(&self, query: MissionQuery) -> MissionStream;

    /// Fetch a single mission. Not found is reported as an error.
    fn mission(&self, id: MissionId) -> BoxFuture<'_, Result<Mission, DbError>>;

    /// Check that the backing store is reachable.
    fn ping(&self) -> BoxFuture<'_, Result<(), DbError>>;
}

impl MissionSource for MissionStore {
    fn missions(&self, query: MissionQuery) -> MissionStream {
        self.stream_missions(query)
    }

    fn mission(&self, id: MissionId) -> BoxFuture<'_, Result<Mission, DbError>> {
        self.fetch_mission(id).boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), DbError>> {
        MissionStore::ping(self).boxed()
    }
}
