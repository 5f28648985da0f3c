//! Engine configuration
//!
//! Read-only inputs to the analysis pipeline: statistical thresholds,
//! sampling windows, and cache freshness. Built once at startup and handed
//! to the engine; nothing here is mutated at runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Freshness TTLs for the cached analysis outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtls {
    /// Pattern snapshot freshness
    pub patterns: Duration,

    /// Anomaly report freshness
    pub anomalies: Duration,

    /// Prediction set freshness
    pub predictions: Duration,

    /// Recommendation list freshness
    pub recommendations: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            patterns: Duration::from_secs(2 * 3600),
            anomalies: Duration::from_secs(3600),
            predictions: Duration::from_secs(6 * 3600),
            recommendations: Duration::from_secs(6 * 3600),
        }
    }
}

/// Configuration for the analytics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rolling window scanned by the anomaly detector, in hours
    pub prediction_window_hours: i64,

    /// Z-score multiplier: a sample is anomalous beyond `threshold * std_dev`
    pub anomaly_threshold: f64,

    /// Minimum samples before the trend predictor will project a signal
    pub min_samples_for_prediction: usize,

    /// Memory usage threshold in megabytes
    pub memory_threshold_mb: f64,

    /// Response time threshold in milliseconds
    pub response_time_threshold_ms: f64,

    /// Query time threshold in milliseconds
    pub query_time_threshold_ms: f64,

    /// History window mined by the pattern analyzer and trend predictor, in days
    pub pattern_window_days: i64,

    /// Event retention horizon for `prune`, in days
    pub retention_days: i64,

    /// Cache freshness per output
    pub cache_ttls: CacheTtls,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prediction_window_hours: 24,
            anomaly_threshold: 2.5,
            min_samples_for_prediction: 20,
            memory_threshold_mb: 128.0,
            response_time_threshold_ms: 2000.0,
            query_time_threshold_ms: 1000.0,
            pattern_window_days: 7,
            retention_days: 30,
            cache_ttls: CacheTtls::default(),
        }
    }
}

impl EngineConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the anomaly detection window in hours
    pub fn prediction_window_hours(mut self, hours: i64) -> Self {
        self.config.prediction_window_hours = hours;
        self
    }

    /// Set the z-score multiplier for anomaly detection
    pub fn anomaly_threshold(mut self, threshold: f64) -> Self {
        self.config.anomaly_threshold = threshold;
        self
    }

    /// Set the minimum sample count for trend projection
    pub fn min_samples_for_prediction(mut self, samples: usize) -> Self {
        self.config.min_samples_for_prediction = samples;
        self
    }

    /// Set the memory threshold in megabytes
    pub fn memory_threshold_mb(mut self, mb: f64) -> Self {
        self.config.memory_threshold_mb = mb;
        self
    }

    /// Set the response time threshold in milliseconds
    pub fn response_time_threshold_ms(mut self, ms: f64) -> Self {
        self.config.response_time_threshold_ms = ms;
        self
    }

    /// Set the query time threshold in milliseconds
    pub fn query_time_threshold_ms(mut self, ms: f64) -> Self {
        self.config.query_time_threshold_ms = ms;
        self
    }

    /// Set the pattern mining window in days
    pub fn pattern_window_days(mut self, days: i64) -> Self {
        self.config.pattern_window_days = days;
        self
    }

    /// Set the retention horizon in days
    pub fn retention_days(mut self, days: i64) -> Self {
        self.config.retention_days = days;
        self
    }

    /// Override the cache freshness TTLs
    pub fn cache_ttls(mut self, ttls: CacheTtls) -> Self {
        self.config.cache_ttls = ttls;
        self
    }

    /// Finish building
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
