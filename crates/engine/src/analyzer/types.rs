//! Analysis output types
//!
//! Typed records produced by the analyzers. Every "insufficient samples"
//! outcome is an absent `Option`, never a zero-filled struct, so consumers
//! cannot distinguish "undetected" from "unmeasurable" — by contract they
//! are the same observable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::Confidence;

/// Direction of a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

/// Direction of the response-time trend, phrased for operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTrend {
    /// Response times are rising
    Degrading,
    /// Response times are flat or falling
    Improving,
}

/// Hour-of-day load profile over the mining window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHours {
    /// Hours (0-23) whose event count exceeds 1.5x the average bucket,
    /// ordered by count descending
    pub hours: Vec<u32>,

    /// Mean event count over hours that saw at least one event
    pub average_load: f64,

    /// Largest peak-hour bucket count, 0 when no hour qualifies
    pub peak_load: f64,
}

impl PeakHours {
    /// Profile for an empty window
    pub fn empty() -> Self {
        Self {
            hours: Vec::new(),
            average_load: 0.0,
            peak_load: 0.0,
        }
    }
}

/// Aggregated response times for one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointStat {
    /// Endpoint URL
    pub url: String,

    /// Number of samples
    pub count: usize,

    /// Mean response time in milliseconds
    pub avg_time_ms: f64,

    /// Worst response time in milliseconds
    pub max_time_ms: f64,
}

/// Fitted memory usage trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTrend {
    /// Mean usage over the window, in megabytes
    pub current_avg_mb: f64,

    /// Whether usage is rising or falling
    pub direction: TrendDirection,

    /// Absolute slope magnitude, megabytes per sample
    pub rate: f64,

    /// Projected usage 168 hours ahead, in megabytes
    pub prediction_7d_mb: f64,
}

/// How often a recurring error message fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorFrequency {
    /// Fewer than two occurrences, or under 0.1/hour
    Rare,
    /// Repeated occurrences within the same hour
    Multiple,
    /// Up to one occurrence per hour
    Moderate,
    /// More than one occurrence per hour
    Frequent,
}

/// One recurring error message and its occurrence profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPattern {
    /// Error message the group shares
    pub message: String,

    /// Occurrences in the window
    pub count: usize,

    /// Earliest occurrence
    pub first_seen: DateTime<Utc>,

    /// Latest occurrence
    pub last_seen: DateTime<Utc>,

    /// Frequency classification
    pub frequency: ErrorFrequency,
}

/// Recurring usage patterns mined from the history window.
///
/// Recomputed wholesale each run; never partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSnapshot {
    /// Hour-of-day load profile
    pub peak_hours: PeakHours,

    /// Slowest endpoints, descending by average time, at most ten
    pub slow_endpoints: Vec<EndpointStat>,

    /// Memory usage trend, absent when no memory samples exist
    pub memory_trend: Option<MemoryTrend>,

    /// Recurring error messages, descending by count
    pub error_patterns: Vec<ErrorPattern>,
}

/// Outlier findings for a point-sampled signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointAnomaly {
    /// Number of anomalous samples
    pub count: usize,

    /// Breach threshold: mean plus the configured multiple of std-dev
    pub threshold: f64,

    /// Largest anomalous sample observed
    pub max_value: f64,
}

/// Outlier findings for an hourly-bucketed rate signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAnomaly {
    /// Offending hour buckets, formatted `YYYY-MM-DD HH:00`, ascending
    pub hours: Vec<String>,

    /// Mean bucket count over the window
    pub normal: f64,

    /// Largest offending bucket count
    pub peak: usize,
}

/// Per-signal anomaly findings over the rolling detection window.
///
/// A signal is `None` both when nothing anomalous was found and when the
/// window held too few samples to judge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Response-time outliers among performance events
    pub response_time: Option<PointAnomaly>,

    /// Memory usage outliers
    pub memory_usage: Option<PointAnomaly>,

    /// Hours with an anomalous exception count
    pub error_rate: Option<RateAnomaly>,

    /// Hours with an anomalous query count
    pub query_count: Option<RateAnomaly>,
}

impl AnomalyReport {
    /// Number of signals with findings
    pub fn active_count(&self) -> usize {
        [
            self.response_time.is_some(),
            self.memory_usage.is_some(),
            self.error_rate.is_some(),
            self.query_count.is_some(),
        ]
        .iter()
        .filter(|&&active| active)
        .count()
    }

    /// Whether no signal has findings
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Names of the signals with findings
    pub fn active_signals(&self) -> Vec<&'static str> {
        let mut signals = Vec::new();
        if self.response_time.is_some() {
            signals.push("response_time");
        }
        if self.memory_usage.is_some() {
            signals.push("memory_usage");
        }
        if self.error_rate.is_some() {
            signals.push("error_rate");
        }
        if self.query_count.is_some() {
            signals.push("query_count");
        }
        signals
    }
}

/// Response-time projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceForecast {
    /// Mean response time over the window, milliseconds
    pub current_avg_ms: f64,

    /// Fitted direction
    pub trend: PerformanceTrend,

    /// Projection 24 hours ahead
    pub prediction_24h_ms: f64,

    /// Projection 168 hours ahead
    pub prediction_7d_ms: f64,

    /// Reliability bucket from the sample count
    pub confidence: Confidence,
}

/// Risk that a projection crosses its configured threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreachRisk {
    Low,
    High,
}

/// Memory usage projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryForecast {
    /// Mean usage over the window, megabytes
    pub current_avg_mb: f64,

    /// Fitted direction
    pub trend: TrendDirection,

    /// Projection 24 hours ahead
    pub prediction_24h_mb: f64,

    /// Projection 168 hours ahead
    pub prediction_7d_mb: f64,

    /// High when the 7-day projection exceeds the memory threshold
    pub threshold_breach_risk: BreachRisk,
}

/// Severity of the projected error-rate trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSeverity {
    Normal,
    Warning,
    Critical,
}

/// Daily error count projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRateForecast {
    /// Most recent day's exception count
    pub current_rate: usize,

    /// Fitted direction of the daily counts
    pub trend: TrendDirection,

    /// Projected daily count seven days ahead, floored at zero
    pub prediction_7d: f64,

    /// Critical when the slope exceeds two per day, warning when positive
    pub severity: ForecastSeverity,
}

/// Downtime risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a composite risk score
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            RiskLevel::Critical
        } else if score > 50.0 {
            RiskLevel::High
        } else if score > 30.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Inputs that contributed to the downtime risk score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// Critical-severity events in the window
    pub critical_events: usize,

    /// Exception events in the window
    pub exceptions: usize,

    /// Performance events beyond twice the response-time threshold
    pub slow_responses: usize,
}

/// Composite downtime risk over the analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeRisk {
    /// Weighted, capped score in `[0, 100]`
    pub score: f64,

    /// Bucketed level
    pub level: RiskLevel,

    /// Contribution breakdown
    pub factors: RiskFactors,
}

/// Per-signal forward projections.
///
/// A signal is `None` when its window held fewer samples than the predictor
/// requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    /// Response-time projection
    pub performance: Option<PerformanceForecast>,

    /// Memory usage projection
    pub memory: Option<MemoryForecast>,

    /// Daily error count projection
    pub error_rate: Option<ErrorRateForecast>,

    /// Composite downtime risk
    pub downtime_risk: Option<DowntimeRisk>,
}

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Performance,
    Memory,
    Availability,
    Scaling,
}

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// One actionable remediation recommendation.
///
/// Generated fresh each run, never mutated; consumers only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// What part of the system it concerns
    pub category: RecommendationCategory,

    /// Urgency
    pub priority: Priority,

    /// Short headline
    pub title: String,

    /// What was observed
    pub description: String,

    /// What to do about it
    pub action: String,
}

/// Health status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    /// Map a clamped score to its status label
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            HealthStatus::Excellent
        } else if score >= 60 {
            HealthStatus::Good
        } else if score >= 40 {
            HealthStatus::Fair
        } else if score >= 20 {
            HealthStatus::Poor
        } else {
            HealthStatus::Critical
        }
    }

    /// String representation used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "critical",
            HealthStatus::Poor => "poor",
            HealthStatus::Fair => "fair",
            HealthStatus::Good => "good",
            HealthStatus::Excellent => "excellent",
        }
    }
}

/// Composite system health, derived on demand from the latest cached
/// anomaly report and prediction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// Score in `[0, 100]`
    pub score: u8,

    /// Bucketed label
    pub status: HealthStatus,
}

/// Latest cached outputs, read wholesale for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsSummary {
    /// Latest pattern snapshot, if fresh
    pub patterns: Option<PatternSnapshot>,

    /// Latest anomaly report, if fresh
    pub anomalies: Option<AnomalyReport>,

    /// Latest prediction set, if fresh
    pub predictions: Option<PredictionSet>,

    /// Latest recommendations, if fresh
    pub recommendations: Option<Vec<Recommendation>>,

    /// When the pipeline last committed a run
    pub last_updated: Option<DateTime<Utc>>,
}
