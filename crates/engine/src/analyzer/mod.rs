//! Analysis pipeline stages
//!
//! The statistical heart of the engine: pattern mining, anomaly detection,
//! trend prediction, recommendation synthesis and health scoring. Each stage
//! is a pure transform over an event window or over the other stages'
//! snapshots, so every step is testable in isolation; side effects and
//! caching belong to the [`crate::engine::InsightsEngine`] driver.

pub mod anomalies;
pub mod health;
pub mod patterns;
pub mod recommendations;
pub mod trends;
pub mod types;

pub use anomalies::AnomalyDetector;
pub use health::HealthScorer;
pub use patterns::PatternAnalyzer;
pub use recommendations::RecommendationEngine;
pub use trends::TrendPredictor;

pub use types::{
    AnomalyReport, BreachRisk, DowntimeRisk, EndpointStat, ErrorFrequency, ErrorPattern,
    ErrorRateForecast, ForecastSeverity, HealthScore, HealthStatus, InsightsSummary,
    MemoryForecast, MemoryTrend, PatternSnapshot, PeakHours, PerformanceForecast,
    PerformanceTrend, PointAnomaly, PredictionSet, Priority, RateAnomaly, Recommendation,
    RecommendationCategory, RiskFactors, RiskLevel, TrendDirection,
};
