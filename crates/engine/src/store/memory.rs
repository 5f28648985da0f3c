//! In-memory event store
//!
//! Vec-backed reference implementation of [`EventStore`]. Suitable for tests
//! and for embedders that keep their history elsewhere and only feed the
//! engine a recent window.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::error::StoreResult;
use super::traits::{EventQuery, EventStore};
use crate::event::{EventRecord, EventType, Payload, Severity};

/// Thread-safe in-memory event store
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<EventRecord>>,
}

impl InMemoryEventStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built record, preserving its id and timestamp.
    ///
    /// Used to seed historical fixtures; `append` is the ingestion path.
    pub async fn insert(&self, record: EventRecord) {
        self.events.write().await.push(record);
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn query(&self, query: EventQuery) -> StoreResult<Vec<EventRecord>> {
        let events = self.events.read().await;

        let mut matches: Vec<EventRecord> = events
            .iter()
            .filter(|record| {
                query
                    .event_type
                    .map_or(true, |t| record.event_type == t)
                    && query.since.map_or(true, |since| record.timestamp >= since)
            })
            .cloned()
            .collect();

        matches.sort_by_key(|record| record.timestamp);
        Ok(matches)
    }

    async fn append(
        &self,
        event_type: EventType,
        severity: Severity,
        payload: Payload,
    ) -> StoreResult<EventRecord> {
        let record = EventRecord::new(event_type, severity, payload);
        debug!(
            event_type = event_type.as_str(),
            severity = severity.as_str(),
            "appending event record"
        );
        self.events.write().await.push(record.clone());
        Ok(record)
    }

    async fn prune(&self, older_than: DateTime<Utc>) -> StoreResult<usize> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|record| record.timestamp >= older_than);
        let removed = before - events.len();
        if removed > 0 {
            debug!(removed, "pruned expired event records");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_at(event_type: EventType, hours_ago: i64) -> EventRecord {
        EventRecord::at(
            event_type,
            Severity::Info,
            Payload::new(),
            Utc::now() - Duration::hours(hours_ago),
        )
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_sequence() {
        let store = InMemoryEventStore::new();
        let records = store.query(EventQuery::since_hours(24)).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_query_filters_by_type_and_window() {
        let store = InMemoryEventStore::new();
        store.insert(record_at(EventType::Query, 1)).await;
        store.insert(record_at(EventType::Memory, 2)).await;
        store.insert(record_at(EventType::Query, 48)).await;

        let recent_queries = store
            .query(EventQuery::since_hours(24).of_type(EventType::Query))
            .await
            .unwrap();
        assert_eq!(recent_queries.len(), 1);
        assert_eq!(recent_queries[0].event_type, EventType::Query);

        let everything = store.query(EventQuery::all()).await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn test_query_orders_ascending_by_timestamp() {
        let store = InMemoryEventStore::new();
        store.insert(record_at(EventType::Query, 1)).await;
        store.insert(record_at(EventType::Query, 10)).await;
        store.insert(record_at(EventType::Query, 5)).await;

        let records = store.query(EventQuery::all()).await.unwrap();
        for pair in records.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_append_assigns_id_and_timestamp() {
        let store = InMemoryEventStore::new();
        let record = store
            .append(
                EventType::Performance,
                Severity::Warning,
                Payload::new().with("response_time", 2500.0),
            )
            .await
            .unwrap();

        assert_eq!(record.severity, Severity::Warning);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_prune_removes_old_records() {
        let store = InMemoryEventStore::new();
        store.insert(record_at(EventType::Query, 1)).await;
        store.insert(record_at(EventType::Query, 100)).await;
        store.insert(record_at(EventType::Query, 200)).await;

        let removed = store.prune(Utc::now() - Duration::hours(48)).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len().await, 1);
    }
}
