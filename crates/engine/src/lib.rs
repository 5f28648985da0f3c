//! Telemetry analytics engine for the Vigil application monitor
//!
//! This crate turns accumulated event history into actionable intelligence:
//! recurring usage patterns, statistical anomalies, trend forecasts, a
//! composite health score and prioritized remediation recommendations.
//! Probes write event records into a store; an external scheduler triggers
//! [`InsightsEngine::run_full_analysis`] periodically; presentation layers
//! read the cached outputs.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use engine::{EngineConfig, InsightsEngine, InMemoryEventStore, Scheduler, TokioScheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let store = Arc::new(InMemoryEventStore::new());
//!     let engine = Arc::new(InsightsEngine::new(store, EngineConfig::default()));
//!
//!     let scheduler = TokioScheduler::new();
//!     scheduler.register_periodic(Duration::from_secs(3600), engine.clone());
//!
//!     // Presentation layers read the cached outputs
//!     let health = engine.health().await;
//!     println!("health: {}/100 ({})", health.score, health.status.as_str());
//! }
//! ```

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod engine;
pub mod event;
pub mod scheduler;
pub mod stats;
pub mod store;

// Re-export commonly used types

pub use analyzer::{
    AnomalyDetector, AnomalyReport, BreachRisk, DowntimeRisk, EndpointStat, ErrorFrequency,
    ErrorPattern, ErrorRateForecast, ForecastSeverity, HealthScore, HealthScorer, HealthStatus,
    InsightsSummary, MemoryForecast, MemoryTrend, PatternAnalyzer, PatternSnapshot, PeakHours,
    PerformanceForecast, PerformanceTrend, PointAnomaly, PredictionSet, Priority, RateAnomaly,
    Recommendation, RecommendationCategory, RecommendationEngine, RiskFactors, RiskLevel,
    TrendDirection, TrendPredictor,
};

pub use cache::{ResultCache, TtlCell};

pub use config::{CacheTtls, EngineConfig, EngineConfigBuilder};

pub use engine::{InsightsEngine, StoreStatistics};

pub use event::{EventRecord, EventType, Payload, Severity};

pub use scheduler::{AnalysisTask, Scheduler, TokioScheduler};

pub use stats::{least_squares_slope, round2, sample_stats, Confidence, SampleStats};

pub use store::{EventQuery, EventStore, InMemoryEventStore, StoreError, StoreResult};
