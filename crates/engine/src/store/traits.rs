//! Event store trait

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::error::StoreResult;
use crate::event::{EventRecord, EventType, Payload, Severity};

/// Filter for reading event history.
///
/// A query selects records at or after `since` (all history when absent),
/// optionally narrowed to one event type. Results are always ordered
/// ascending by timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventQuery {
    /// Only records of this type, or every type when `None`
    pub event_type: Option<EventType>,

    /// Only records at or after this instant, or all history when `None`
    pub since: Option<DateTime<Utc>>,
}

impl EventQuery {
    /// All records, any type, any age
    pub fn all() -> Self {
        Self {
            event_type: None,
            since: None,
        }
    }

    /// Records from the last `hours` hours
    pub fn since_hours(hours: i64) -> Self {
        Self {
            event_type: None,
            since: Some(Utc::now() - Duration::hours(hours)),
        }
    }

    /// Records from the last `days` days
    pub fn since_days(days: i64) -> Self {
        Self {
            event_type: None,
            since: Some(Utc::now() - Duration::days(days)),
        }
    }

    /// Narrow the query to one event type
    pub fn of_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }
}

/// Read/write access to the event history.
///
/// The engine is a reader plus a narrow writer (consolidated insight events);
/// probes own ingestion. Implementations must tolerate an empty store by
/// returning an empty sequence, not an error.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch records matching the query, ascending by timestamp
    async fn query(&self, query: EventQuery) -> StoreResult<Vec<EventRecord>>;

    /// Append a new record timestamped now
    async fn append(
        &self,
        event_type: EventType,
        severity: Severity,
        payload: Payload,
    ) -> StoreResult<EventRecord>;

    /// Delete records older than the given instant, returning how many were removed
    async fn prune(&self, older_than: DateTime<Utc>) -> StoreResult<usize>;
}
