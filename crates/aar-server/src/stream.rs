//! Incremental JSON array encoding of mission streams.
//!
//! A list response is sent as `[`, then each mission as it is read from
//! the database, then `]`, without holding the result set in memory.
//!
//! Once the opening bracket has been sent the status line is gone too, so
//! later failures cannot turn into an error response. The policy is:
//!
//! - a row that fails to decode (or serialize) is logged and left out;
//!   commas are only written between emitted elements, so the array stays
//!   valid
//! - a fatal stream error after the first byte is logged and the array is
//!   closed early
//!
//! [`prime`] runs before the response is committed and pulls the first
//! row, which is where query execution failures surface. Those are still
//! returned as errors and become a 500.

use std::convert::Infallible;

use aar_db::{DbError, MissionStream};
use aar_types::Mission;
use axum::body::{Body, Bytes};
use futures::{Stream, StreamExt};

/// Typical encoded size of one mission, used to size element buffers.
const ELEMENT_CAPACITY: usize = 192;

/// A mission stream whose first row (if any) has been read.
pub struct PrimedMissions {
    first: Option<Mission>,
    rest: Option<MissionStream>,
}

impl PrimedMissions {
    /// Whether the query returned no decodable rows at all.
    pub const fn is_empty(&self) -> bool {
        self.first.is_none()
    }
}

/// Read up to the first decodable mission.
///
/// Rows that fail to decode along the way are logged and skipped.
///
/// # Errors
///
/// Returns the first non-row error, typically the query failing to
/// execute.
pub async fn prime(mut rows: MissionStream) -> Result<PrimedMissions, DbError> {
    while let Some(item) = rows.next().await {
        match item {
            Ok(mission) => {
                return Ok(PrimedMissions {
                    first: Some(mission),
                    rest: Some(rows),
                });
            }
            Err(e) if e.is_row_decode() => skip_row(&e),
            Err(e) => return Err(e),
        }
    }

    Ok(PrimedMissions {
        first: None,
        rest: None,
    })
}

/// Response body streaming `primed` as a JSON array.
pub fn json_array_body(primed: PrimedMissions) -> Body {
    Body::from_stream(encode_json_array(primed))
}

/// Encode missions as the chunks of a JSON array.
pub fn encode_json_array(
    primed: PrimedMissions,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let PrimedMissions { first, rest } = primed;

    async_stream::stream! {
        yield Ok(Bytes::from_static(b"["));
        let mut emitted: u64 = 0;

        if let Some(mission) = first {
            if let Some(chunk) = encode_element(&mission, emitted == 0) {
                emitted = emitted.saturating_add(1);
                yield Ok(chunk);
            }
        }

        if let Some(mut rows) = rest {
            while let Some(item) = rows.next().await {
                match item {
                    Ok(mission) => {
                        if let Some(chunk) = encode_element(&mission, emitted == 0) {
                            emitted = emitted.saturating_add(1);
                            yield Ok(chunk);
                        }
                    }
                    Err(e) if e.is_row_decode() => skip_row(&e),
                    Err(e) => {
                        tracing::error!(error = %e, emitted, "Mission stream failed mid-response, closing array early");
                        break;
                    }
                }
            }
        }

        yield Ok(Bytes::from_static(b"]"));
        tracing::debug!(emitted, "Mission array complete");
    }
}

/// One array element, preceded by a comma unless it is the first.
fn encode_element(mission: &Mission, first: bool) -> Option<Bytes> {
    let mut buf = Vec::with_capacity(ELEMENT_CAPACITY);
    if !first {
        buf.push(b',');
    }

    match serde_json::to_writer(&mut buf, mission) {
        Ok(()) => Some(Bytes::from(buf)),
        Err(e) => {
            tracing::warn!(mission_id = %mission.id, error = %e, "Skipping mission that failed to serialize");
            None
        }
    }
}

fn skip_row(e: &DbError) {
    tracing::warn!(error = %e, "Skipping mission row that failed to decode");
}
