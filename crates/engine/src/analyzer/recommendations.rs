//! Recommendation engine
//!
//! Rule-based synthesis of remediation recommendations from the latest
//! cached pattern, anomaly and prediction snapshots. Rules fire in a fixed
//! order and that order is the final ordering of the output; no secondary
//! sort is applied, even between equal priorities.

use tracing::debug;

use super::types::{
    AnomalyReport, BreachRisk, PatternSnapshot, PredictionSet, Priority, Recommendation,
    RecommendationCategory, RiskLevel,
};

/// Endpoints named in a performance recommendation
const NAMED_ENDPOINT_CAP: usize = 3;

/// Synthesizes prioritized recommendations from cached analysis outputs
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Create an engine
    pub fn new() -> Self {
        Self
    }

    /// Apply the rule set to the latest snapshots.
    ///
    /// The anomaly report is part of the engine's inputs for future rules but
    /// no current rule consumes it. Missing or stale snapshots simply cause
    /// their rules to not fire; empty inputs yield an empty list.
    pub fn synthesize(
        &self,
        patterns: Option<&PatternSnapshot>,
        _anomalies: Option<&AnomalyReport>,
        predictions: Option<&PredictionSet>,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if let Some(snapshot) = patterns {
            if !snapshot.slow_endpoints.is_empty() {
                let worst: Vec<&str> = snapshot
                    .slow_endpoints
                    .iter()
                    .take(NAMED_ENDPOINT_CAP)
                    .map(|endpoint| endpoint.url.as_str())
                    .collect();

                recommendations.push(Recommendation {
                    category: RecommendationCategory::Performance,
                    priority: Priority::High,
                    title: "Optimize Slow Endpoints".to_string(),
                    description: "Multiple endpoints showing high response times".to_string(),
                    action: format!(
                        "Review and optimize the following endpoints: {}",
                        worst.join(", ")
                    ),
                });
            }
        }

        if let Some(memory) = predictions.and_then(|set| set.memory.as_ref()) {
            if memory.threshold_breach_risk == BreachRisk::High {
                recommendations.push(Recommendation {
                    category: RecommendationCategory::Memory,
                    priority: Priority::Critical,
                    title: "Memory Threshold Breach Predicted".to_string(),
                    description: "Memory usage is predicted to exceed threshold within 7 days"
                        .to_string(),
                    action: "Investigate memory leaks and optimize memory-intensive operations"
                        .to_string(),
                });
            }
        }

        if let Some(risk) = predictions.and_then(|set| set.downtime_risk.as_ref()) {
            if matches!(risk.level, RiskLevel::High | RiskLevel::Critical) {
                recommendations.push(Recommendation {
                    category: RecommendationCategory::Availability,
                    priority: Priority::Critical,
                    title: "High Downtime Risk Detected".to_string(),
                    description: "System stability is at risk based on current trends".to_string(),
                    action: "Immediate attention required - Review critical issues and performance metrics"
                        .to_string(),
                });
            }
        }

        if let Some(snapshot) = patterns {
            if !snapshot.peak_hours.hours.is_empty() {
                let hours: Vec<String> = snapshot
                    .peak_hours
                    .hours
                    .iter()
                    .map(|hour| format!("{hour}:00"))
                    .collect();

                recommendations.push(Recommendation {
                    category: RecommendationCategory::Scaling,
                    priority: Priority::Medium,
                    title: "Scale During Peak Hours".to_string(),
                    description: "Consistent high load detected during specific hours".to_string(),
                    action: format!(
                        "Consider auto-scaling during peak hours: {}",
                        hours.join(", ")
                    ),
                });
            }
        }

        debug!(count = recommendations.len(), "recommendations synthesized");
        recommendations
    }
}
