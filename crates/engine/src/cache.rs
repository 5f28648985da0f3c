//! Result cache
//!
//! Holds the last computed snapshot of each analysis output behind a
//! freshness TTL. Every write is a full-snapshot replace: readers observe
//! either the previous snapshot or the new one, never a mix. The engine is
//! the sole writer; presentation layers only read.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::trace;

use crate::analyzer::types::{AnomalyReport, PatternSnapshot, PredictionSet, Recommendation};
use crate::config::CacheTtls;

struct Slot<T> {
    value: T,
    expires_at: Instant,
}

/// Single-value cache cell with a time-to-live.
///
/// `put` swaps the whole value atomically; `get` returns `None` once the TTL
/// has elapsed, so stale snapshots read the same as missing ones.
pub struct TtlCell<T> {
    name: &'static str,
    ttl: Duration,
    slot: RwLock<Option<Slot<T>>>,
}

impl<T: Clone> TtlCell<T> {
    /// Create an empty cell
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Replace the cached value wholesale
    pub async fn put(&self, value: T) {
        trace!(key = self.name, "caching snapshot");
        *self.slot.write().await = Some(Slot {
            value,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Read the cached value, `None` when absent or expired
    pub async fn get(&self) -> Option<T> {
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Drop the cached value
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

/// Cached snapshots of the four analysis outputs plus the last refresh time
pub struct ResultCache {
    patterns: TtlCell<PatternSnapshot>,
    anomalies: TtlCell<AnomalyReport>,
    predictions: TtlCell<PredictionSet>,
    recommendations: TtlCell<Vec<Recommendation>>,
    last_updated: RwLock<Option<DateTime<Utc>>>,
}

impl ResultCache {
    /// Create an empty cache with the given freshness TTLs
    pub fn new(ttls: &CacheTtls) -> Self {
        Self {
            patterns: TtlCell::new("patterns", ttls.patterns),
            anomalies: TtlCell::new("anomalies", ttls.anomalies),
            predictions: TtlCell::new("predictions", ttls.predictions),
            recommendations: TtlCell::new("recommendations", ttls.recommendations),
            last_updated: RwLock::new(None),
        }
    }

    /// Pattern snapshot slot
    pub fn patterns(&self) -> &TtlCell<PatternSnapshot> {
        &self.patterns
    }

    /// Anomaly report slot
    pub fn anomalies(&self) -> &TtlCell<AnomalyReport> {
        &self.anomalies
    }

    /// Prediction set slot
    pub fn predictions(&self) -> &TtlCell<PredictionSet> {
        &self.predictions
    }

    /// Recommendation list slot
    pub fn recommendations(&self) -> &TtlCell<Vec<Recommendation>> {
        &self.recommendations
    }

    /// When the pipeline last committed a full run
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        *self.last_updated.read().await
    }

    /// Record a completed pipeline run
    pub async fn touch(&self) {
        *self.last_updated.write().await = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::{Priority, RecommendationCategory};

    #[tokio::test]
    async fn test_get_returns_none_when_empty() {
        let cell: TtlCell<u32> = TtlCell::new("test", Duration::from_secs(60));
        assert_eq!(cell.get().await, None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cell = TtlCell::new("test", Duration::from_secs(60));
        cell.put(7u32).await;
        assert_eq!(cell.get().await, Some(7));
    }

    #[tokio::test]
    async fn test_put_replaces_whole_value() {
        let cell = TtlCell::new("test", Duration::from_secs(60));
        cell.put(vec![1, 2, 3]).await;
        cell.put(vec![9]).await;
        assert_eq!(cell.get().await, Some(vec![9]));
    }

    #[tokio::test]
    async fn test_expired_value_reads_as_missing() {
        let cell = TtlCell::new("test", Duration::from_millis(10));
        cell.put(1u32).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cell.get().await, None);
    }

    #[tokio::test]
    async fn test_clear() {
        let cell = TtlCell::new("test", Duration::from_secs(60));
        cell.put(1u32).await;
        cell.clear().await;
        assert_eq!(cell.get().await, None);
    }

    #[tokio::test]
    async fn test_result_cache_slots_start_empty() {
        let cache = ResultCache::new(&CacheTtls::default());
        assert!(cache.patterns().get().await.is_none());
        assert!(cache.anomalies().get().await.is_none());
        assert!(cache.predictions().get().await.is_none());
        assert!(cache.recommendations().get().await.is_none());
        assert!(cache.last_updated().await.is_none());
    }

    #[tokio::test]
    async fn test_result_cache_round_trip() {
        let cache = ResultCache::new(&CacheTtls::default());

        cache
            .recommendations()
            .put(vec![Recommendation {
                category: RecommendationCategory::Scaling,
                priority: Priority::Medium,
                title: "Scale During Peak Hours".to_string(),
                description: "Consistent high load detected during specific hours".to_string(),
                action: "Consider auto-scaling during peak hours: 9:00".to_string(),
            }])
            .await;
        cache.touch().await;

        let cached = cache.recommendations().get().await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].priority, Priority::Medium);
        assert!(cache.last_updated().await.is_some());
    }
}
