//! Anomaly detector
//!
//! Scans a rolling window for statistical outliers in response time, memory
//! usage, error rate and query volume. Point-sampled signals are judged
//! two-sided against a z-score threshold; hourly-bucketed rate signals are
//! judged one-sided, since a low rate is never concerning.

use std::collections::BTreeMap;
use tracing::debug;

use super::types::{AnomalyReport, PointAnomaly, RateAnomaly};
use crate::config::EngineConfig;
use crate::event::{EventRecord, EventType};
use crate::stats::{round2, sample_stats};

/// Point signals need at least this many raw samples
const MIN_POINT_SAMPLES: usize = 10;

/// Bucketed signals need at least this many non-empty hourly buckets
const MIN_RATE_BUCKETS: usize = 5;

/// Detects statistical outliers over a rolling event window
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    threshold: f64,
}

impl AnomalyDetector {
    /// Create a detector using the configured z-score threshold
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            threshold: config.anomaly_threshold,
        }
    }

    /// Scan the window and report per-signal findings
    pub fn detect(&self, events: &[EventRecord]) -> AnomalyReport {
        let report = AnomalyReport {
            response_time: self.detect_point(&numbers_of(events, EventType::Performance, "response_time")),
            memory_usage: self.detect_point(&numbers_of(events, EventType::Memory, "usage")),
            error_rate: self.detect_rate(&hourly_buckets(events, EventType::Exception)),
            query_count: self.detect_rate(&hourly_buckets(events, EventType::Query)),
        };

        if !report.is_empty() {
            debug!(signals = ?report.active_signals(), "anomalies detected");
        }

        report
    }

    /// Two-sided z-score scan of a point-sampled signal
    fn detect_point(&self, values: &[f64]) -> Option<PointAnomaly> {
        if values.len() < MIN_POINT_SAMPLES {
            return None;
        }

        let stats = sample_stats(values);
        let spread = self.threshold * stats.std_dev;

        let anomalous: Vec<f64> = values
            .iter()
            .copied()
            .filter(|value| (value - stats.mean).abs() > spread)
            .collect();

        if anomalous.is_empty() {
            return None;
        }

        Some(PointAnomaly {
            count: anomalous.len(),
            threshold: round2(stats.mean + spread),
            max_value: anomalous.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// One-sided scan of hourly bucket counts
    fn detect_rate(&self, buckets: &BTreeMap<String, usize>) -> Option<RateAnomaly> {
        if buckets.len() < MIN_RATE_BUCKETS {
            return None;
        }

        let counts: Vec<f64> = buckets.values().map(|&count| count as f64).collect();
        let stats = sample_stats(&counts);
        let cutoff = stats.mean + self.threshold * stats.std_dev;

        let offenders: Vec<(&String, usize)> = buckets
            .iter()
            .filter(|&(_, &count)| count as f64 > cutoff)
            .map(|(hour, &count)| (hour, count))
            .collect();

        if offenders.is_empty() {
            return None;
        }

        Some(RateAnomaly {
            peak: offenders.iter().map(|&(_, count)| count).max().unwrap_or(0),
            hours: offenders.into_iter().map(|(hour, _)| hour.clone()).collect(),
            normal: round2(stats.mean),
        })
    }
}

/// Pluck one numeric payload field from every event of the given type
fn numbers_of(events: &[EventRecord], event_type: EventType, key: &str) -> Vec<f64> {
    events
        .iter()
        .filter(|event| event.event_type == event_type)
        .map(|event| event.payload.number(key).unwrap_or(0.0))
        .collect()
}

/// Count events of the given type per calendar hour
fn hourly_buckets(events: &[EventRecord], event_type: EventType) -> BTreeMap<String, usize> {
    let mut buckets = BTreeMap::new();
    for event in events {
        if event.event_type != event_type {
            continue;
        }
        let hour = event.timestamp.format("%Y-%m-%d %H:00").to_string();
        *buckets.entry(hour).or_insert(0) += 1;
    }
    buckets
}
