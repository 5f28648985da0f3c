//! Analytics engine driver
//!
//! [`InsightsEngine`] owns the event store handle, the result cache and the
//! analyzers, and drives the periodic pipeline: patterns, anomalies,
//! predictions, recommendations, each committed to the cache as a full
//! snapshot. Presentation layers read the cached outputs through the
//! accessors here; they never trigger analysis synchronously.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::analyzer::{
    AnomalyDetector, AnomalyReport, HealthScore, HealthScorer, InsightsSummary, PatternAnalyzer,
    PatternSnapshot, PredictionSet, Recommendation, RecommendationEngine, TrendPredictor,
};
use crate::analyzer::types::Priority;
use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::event::{EventType, Payload, Severity};
use crate::store::{EventQuery, EventStore};

/// Aggregate counters over the whole event history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStatistics {
    /// Records in the store
    pub total_events: usize,

    /// Records observed today
    pub today_events: usize,

    /// Critical-severity records in the store
    pub critical_events: usize,

    /// Mean response time over the last 24 hours, milliseconds
    pub average_response_time_ms: f64,

    /// Queries beyond their threshold in the last 24 hours
    pub slow_query_count: usize,
}

/// The telemetry analytics engine.
///
/// Holds its collaborators explicitly; callers keep a reference (usually an
/// `Arc`) rather than reaching into global state. A scheduler invokes
/// [`run_full_analysis`](Self::run_full_analysis) periodically; everything
/// else is a cache read.
pub struct InsightsEngine {
    store: Arc<dyn EventStore>,
    cache: ResultCache,
    config: EngineConfig,
    pattern_analyzer: PatternAnalyzer,
    anomaly_detector: AnomalyDetector,
    trend_predictor: TrendPredictor,
    recommendation_engine: RecommendationEngine,
    health_scorer: HealthScorer,
    run_guard: Mutex<()>,
}

impl InsightsEngine {
    /// Create an engine over the given store and configuration
    pub fn new(store: Arc<dyn EventStore>, config: EngineConfig) -> Self {
        Self {
            cache: ResultCache::new(&config.cache_ttls),
            pattern_analyzer: PatternAnalyzer::new(),
            anomaly_detector: AnomalyDetector::new(&config),
            trend_predictor: TrendPredictor::new(&config),
            recommendation_engine: RecommendationEngine::new(),
            health_scorer: HealthScorer::new(),
            run_guard: Mutex::new(()),
            store,
            config,
        }
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline once, committing each output to the cache.
    ///
    /// Concurrent triggers serialize on an internal guard, so overlapping
    /// runs cannot interleave partial writes. A stage whose store read fails
    /// is skipped and leaves its previous snapshot untouched.
    pub async fn run_full_analysis(&self) {
        let _guard = self.run_guard.lock().await;
        info!("starting full analysis run");

        self.analyze_patterns().await;
        self.detect_anomalies().await;
        self.generate_predictions().await;
        self.generate_recommendations().await;

        self.cache.touch().await;
        info!("full analysis run committed");
    }

    /// Mine the pattern window and cache the snapshot
    pub async fn analyze_patterns(&self) -> Option<PatternSnapshot> {
        let query = EventQuery::since_days(self.config.pattern_window_days);
        let events = match self.store.query(query).await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "skipping pattern analysis: event store read failed");
                return None;
            }
        };

        let snapshot = self.pattern_analyzer.analyze(&events);
        self.cache.patterns().put(snapshot.clone()).await;
        Some(snapshot)
    }

    /// Scan the rolling window for anomalies and cache the report.
    ///
    /// When any signal fires, one consolidated warning event is appended to
    /// the store so downstream alerting can react; a failed append is logged
    /// and ignored.
    pub async fn detect_anomalies(&self) -> Option<AnomalyReport> {
        let query = EventQuery::since_hours(self.config.prediction_window_hours);
        let events = match self.store.query(query).await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "skipping anomaly detection: event store read failed");
                return None;
            }
        };

        let report = self.anomaly_detector.detect(&events);

        if !report.is_empty() {
            let payload = Payload::new()
                .with("type", "anomaly_detected")
                .with("signals", report.active_signals().join(", "))
                .with("signal_count", report.active_count() as u64);

            if let Err(err) = self
                .store
                .append(EventType::Insight, Severity::Warning, payload)
                .await
            {
                warn!(error = %err, "failed to record anomaly consolidation event");
            }
        }

        self.cache.anomalies().put(report.clone()).await;
        Some(report)
    }

    /// Project the signal trends and cache the prediction set
    pub async fn generate_predictions(&self) -> Option<PredictionSet> {
        let query = EventQuery::since_days(self.config.pattern_window_days);
        let events = match self.store.query(query).await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "skipping trend prediction: event store read failed");
                return None;
            }
        };

        let predictions = self.trend_predictor.predict(&events);
        self.cache.predictions().put(predictions.clone()).await;
        Some(predictions)
    }

    /// Synthesize recommendations from the cached snapshots and cache them.
    ///
    /// Reads the other stages' latest cached outputs rather than recomputing
    /// them. A non-empty result appends an informational notice to the store;
    /// a failed append is logged and ignored.
    pub async fn generate_recommendations(&self) -> Vec<Recommendation> {
        let patterns = self.cache.patterns().get().await;
        let anomalies = self.cache.anomalies().get().await;
        let predictions = self.cache.predictions().get().await;

        let recommendations = self.recommendation_engine.synthesize(
            patterns.as_ref(),
            anomalies.as_ref(),
            predictions.as_ref(),
        );

        self.cache
            .recommendations()
            .put(recommendations.clone())
            .await;

        if !recommendations.is_empty() {
            let payload = Payload::new()
                .with("type", "recommendations_generated")
                .with("count", recommendations.len() as u64);

            if let Err(err) = self
                .store
                .append(EventType::Insight, Severity::Info, payload)
                .await
            {
                warn!(error = %err, "failed to record recommendation notice");
            }
        }

        recommendations
    }

    /// Latest cached pattern snapshot, if fresh
    pub async fn patterns(&self) -> Option<PatternSnapshot> {
        self.cache.patterns().get().await
    }

    /// Latest cached anomaly report, if fresh
    pub async fn anomalies(&self) -> Option<AnomalyReport> {
        self.cache.anomalies().get().await
    }

    /// Latest cached prediction set, if fresh
    pub async fn predictions(&self) -> Option<PredictionSet> {
        self.cache.predictions().get().await
    }

    /// Latest cached recommendations, if fresh
    pub async fn recommendations(&self) -> Option<Vec<Recommendation>> {
        self.cache.recommendations().get().await
    }

    /// Composite health score, recomputed from the latest cached outputs
    pub async fn health(&self) -> HealthScore {
        let anomalies = self.cache.anomalies().get().await;
        let predictions = self.cache.predictions().get().await;
        self.health_scorer
            .score(anomalies.as_ref(), predictions.as_ref())
    }

    /// All cached outputs plus the last run timestamp, read wholesale
    pub async fn insights_summary(&self) -> InsightsSummary {
        InsightsSummary {
            patterns: self.cache.patterns().get().await,
            anomalies: self.cache.anomalies().get().await,
            predictions: self.cache.predictions().get().await,
            recommendations: self.cache.recommendations().get().await,
            last_updated: self.cache.last_updated().await,
        }
    }

    /// Whether the latest cached anomaly report has any findings
    pub async fn has_active_anomalies(&self) -> bool {
        self.cache
            .anomalies()
            .get()
            .await
            .map(|report| !report.is_empty())
            .unwrap_or(false)
    }

    /// Whether any cached recommendation is critical
    pub async fn has_critical_recommendations(&self) -> bool {
        self.cache
            .recommendations()
            .get()
            .await
            .map(|recommendations| {
                recommendations
                    .iter()
                    .any(|rec| rec.priority == Priority::Critical)
            })
            .unwrap_or(false)
    }

    /// Aggregate counters over the whole history, zeros when the store is
    /// unreachable
    pub async fn store_statistics(&self) -> StoreStatistics {
        let events = match self.store.query(EventQuery::all()).await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "store statistics unavailable: event store read failed");
                return StoreStatistics::default();
            }
        };

        let now = Utc::now();
        let today = now.date_naive();
        let day_ago = now - Duration::hours(24);

        let response_times: Vec<f64> = events
            .iter()
            .filter(|event| {
                event.event_type == EventType::Performance && event.timestamp >= day_ago
            })
            .map(|event| event.payload.number("response_time").unwrap_or(0.0))
            .collect();
        let average_response_time_ms = if response_times.is_empty() {
            0.0
        } else {
            crate::stats::round2(response_times.iter().sum::<f64>() / response_times.len() as f64)
        };

        StoreStatistics {
            total_events: events.len(),
            today_events: events
                .iter()
                .filter(|event| event.timestamp.date_naive() == today)
                .count(),
            critical_events: events
                .iter()
                .filter(|event| event.severity == Severity::Critical)
                .count(),
            average_response_time_ms,
            slow_query_count: events
                .iter()
                .filter(|event| {
                    event.event_type == EventType::Query
                        && event.severity != Severity::Info
                        && event.timestamp >= day_ago
                })
                .count(),
        }
    }

    /// Delete records past the retention horizon, returning how many were
    /// removed; zero when the store is unreachable
    pub async fn prune_expired(&self) -> usize {
        let horizon = Utc::now() - Duration::days(self.config.retention_days);
        match self.store.prune(horizon).await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(error = %err, "retention prune failed");
                0
            }
        }
    }
}
