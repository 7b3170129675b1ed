//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] error and records whether the failure concerned a single row
//! or the query as a whole.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed (connectivity, SQL, permissions,
    /// or no row where exactly one was expected).
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A fetched row could not be decoded into a mission.
    #[error("Row decode error: {0}")]
    RowDecode(#[source] sqlx::Error),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether this error concerns a single row rather than the query.
    ///
    /// Streams keep going past row decode failures; every other error
    /// ends the stream.
    pub const fn is_row_decode(&self) -> bool {
        matches!(self, Self::RowDecode(_))
    }

    /// Whether a single-row lookup matched nothing.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Postgres(sqlx::Error::RowNotFound))
    }
}
