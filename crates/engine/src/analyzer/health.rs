//! Health scorer
//!
//! Derives the composite 0-100 health score from the latest cached anomaly
//! report and prediction set. The score is never stored: it is recomputed on
//! demand so it always reflects the freshest cached inputs.

use super::types::{AnomalyReport, HealthScore, HealthStatus, PredictionSet};

/// Each active anomaly signal costs this many points
const ANOMALY_PENALTY: f64 = 10.0;

/// Anomalies can cost at most this many points in total
const ANOMALY_PENALTY_CAP: f64 = 30.0;

/// Computes the composite health score
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthScorer;

impl HealthScorer {
    /// Create a scorer
    pub fn new() -> Self {
        Self
    }

    /// Score the system from the latest cached outputs.
    ///
    /// Starts at 100, subtracts the downtime risk score and a capped penalty
    /// per active anomaly signal, and clamps to `[0, 100]`. Absent inputs
    /// subtract nothing, so an idle system scores a perfect 100.
    pub fn score(
        &self,
        anomalies: Option<&AnomalyReport>,
        predictions: Option<&PredictionSet>,
    ) -> HealthScore {
        let mut score = 100.0;

        if let Some(risk) = predictions.and_then(|set| set.downtime_risk.as_ref()) {
            score -= risk.score;
        }

        if let Some(report) = anomalies {
            score -= (report.active_count() as f64 * ANOMALY_PENALTY).min(ANOMALY_PENALTY_CAP);
        }

        let clamped = score.clamp(0.0, 100.0).round() as u8;

        HealthScore {
            score: clamped,
            status: HealthStatus::from_score(clamped),
        }
    }
}
