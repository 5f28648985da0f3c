//! Trend predictor
//!
//! Projects response time, memory usage and error rate forward over 24-hour
//! and 7-day horizons, and derives a composite downtime risk score from the
//! same window. Projections use the unit-slope convention of the statistics
//! kernel: horizons are unit counts, not wall-clock durations.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use super::types::{
    BreachRisk, DowntimeRisk, ErrorRateForecast, ForecastSeverity, MemoryForecast,
    PerformanceForecast, PerformanceTrend, PredictionSet, RiskFactors, RiskLevel, TrendDirection,
};
use crate::config::EngineConfig;
use crate::event::{EventRecord, EventType, Severity};
use crate::stats::{least_squares_slope, round2, Confidence};

/// Hours in the 24-hour projection horizon
const HOURS_24H: f64 = 24.0;

/// Hours in the seven-day projection horizon
const HOURS_7D: f64 = 168.0;

/// Days of history required before projecting the error rate
const MIN_ERROR_RATE_DAYS: usize = 3;

/// Projects signal trajectories over an event window
#[derive(Debug, Clone)]
pub struct TrendPredictor {
    min_samples: usize,
    memory_threshold_mb: f64,
    response_time_threshold_ms: f64,
}

impl TrendPredictor {
    /// Create a predictor from the engine configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_samples: config.min_samples_for_prediction,
            memory_threshold_mb: config.memory_threshold_mb,
            response_time_threshold_ms: config.response_time_threshold_ms,
        }
    }

    /// Compute all four projections over the given window
    pub fn predict(&self, events: &[EventRecord]) -> PredictionSet {
        let set = PredictionSet {
            performance: self.predict_performance(events),
            memory: self.predict_memory(events),
            error_rate: self.predict_error_rate(events),
            downtime_risk: self.assess_downtime_risk(events),
        };

        if let Some(risk) = &set.downtime_risk {
            debug!(score = risk.score, level = ?risk.level, "downtime risk assessed");
        }

        set
    }

    /// Project response times 24h and 7d ahead
    fn predict_performance(&self, events: &[EventRecord]) -> Option<PerformanceForecast> {
        let times = numbers_of(events, EventType::Performance, "response_time");
        if times.len() < self.min_samples {
            return None;
        }

        let avg = times.iter().sum::<f64>() / times.len() as f64;
        let slope = least_squares_slope(&times);
        let trend = if slope > 0.0 {
            PerformanceTrend::Degrading
        } else {
            PerformanceTrend::Improving
        };

        Some(PerformanceForecast {
            current_avg_ms: round2(avg),
            trend,
            prediction_24h_ms: round2(avg + slope * HOURS_24H),
            prediction_7d_ms: round2(avg + slope * HOURS_7D),
            confidence: Confidence::from_sample_size(times.len()),
        })
    }

    /// Project memory usage and flag a predicted threshold breach
    fn predict_memory(&self, events: &[EventRecord]) -> Option<MemoryForecast> {
        let usages = numbers_of(events, EventType::Memory, "usage");
        if usages.len() < self.min_samples {
            return None;
        }

        let avg = usages.iter().sum::<f64>() / usages.len() as f64;
        let slope = least_squares_slope(&usages);
        let prediction_7d = avg + slope * HOURS_7D;

        let trend = if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };
        let breach_risk = if prediction_7d > self.memory_threshold_mb {
            BreachRisk::High
        } else {
            BreachRisk::Low
        };

        Some(MemoryForecast {
            current_avg_mb: round2(avg),
            trend,
            prediction_24h_mb: round2(avg + slope * HOURS_24H),
            prediction_7d_mb: round2(prediction_7d),
            threshold_breach_risk: breach_risk,
        })
    }

    /// Fit daily exception counts and project a week ahead
    fn predict_error_rate(&self, events: &[EventRecord]) -> Option<ErrorRateForecast> {
        let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for event in events {
            if event.event_type == EventType::Exception {
                *daily.entry(event.timestamp.date_naive()).or_insert(0) += 1;
            }
        }

        if daily.len() < MIN_ERROR_RATE_DAYS {
            return None;
        }

        let counts: Vec<f64> = daily.values().map(|&count| count as f64).collect();
        let slope = least_squares_slope(&counts);
        let current = *daily.values().last().unwrap_or(&0);

        let severity = if slope > 2.0 {
            ForecastSeverity::Critical
        } else if slope > 0.0 {
            ForecastSeverity::Warning
        } else {
            ForecastSeverity::Normal
        };
        let trend = if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };

        Some(ErrorRateForecast {
            current_rate: current,
            trend,
            prediction_7d: round2((current as f64 + slope * 7.0).max(0.0)),
            severity,
        })
    }

    /// Combine critical events, exceptions and severe slowdowns into a
    /// capped risk score
    fn assess_downtime_risk(&self, events: &[EventRecord]) -> Option<DowntimeRisk> {
        if events.is_empty() {
            return None;
        }

        let severe_cutoff = self.response_time_threshold_ms * 2.0;

        let critical_events = events
            .iter()
            .filter(|event| event.severity == Severity::Critical)
            .count();
        let exceptions = events
            .iter()
            .filter(|event| event.event_type == EventType::Exception)
            .count();
        let slow_responses = events
            .iter()
            .filter(|event| {
                event.event_type == EventType::Performance
                    && event.payload.number("response_time").unwrap_or(0.0) > severe_cutoff
            })
            .count();

        let score = round2(
            (critical_events as f64 * 10.0).min(40.0)
                + (exceptions as f64 * 0.5).min(30.0)
                + (slow_responses as f64 * 2.0).min(30.0),
        );

        Some(DowntimeRisk {
            score,
            level: RiskLevel::from_score(score),
            factors: RiskFactors {
                critical_events,
                exceptions,
                slow_responses,
            },
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Payload;
    use chrono::{Duration, TimeZone, Utc};

    fn predictor() -> TrendPredictor {
        TrendPredictor::new(&EngineConfig::default())
    }

    fn perf_event(response_time: f64) -> EventRecord {
        EventRecord::new(
            EventType::Performance,
            Severity::Info,
            Payload::new().with("response_time", response_time),
        )
    }

    fn memory_event(usage: f64) -> EventRecord {
        EventRecord::new(
            EventType::Memory,
            Severity::Info,
            Payload::new().with("usage", usage),
        )
    }

    #[test]
    fn test_performance_below_minimum_samples_is_none() {
        let events: Vec<EventRecord> = (0..19).map(|_| perf_event(100.0)).collect();
        assert!(predictor().predict_performance(&events).is_none());
    }

    #[test]
    fn test_performance_projection_follows_unit_slope() {
        // 20 samples rising by 10ms per sample: slope 10, mean 195
        let events: Vec<EventRecord> = (0..20)
            .map(|i| perf_event(100.0 + 10.0 * i as f64))
            .collect();

        let forecast = predictor().predict_performance(&events).unwrap();
        assert_eq!(forecast.current_avg_ms, 195.0);
        assert_eq!(forecast.trend, PerformanceTrend::Degrading);
        assert_eq!(forecast.prediction_24h_ms, 195.0 + 10.0 * 24.0);
        assert_eq!(forecast.prediction_7d_ms, 195.0 + 10.0 * 168.0);
        assert_eq!(forecast.confidence, Confidence::Medium);
    }

    #[test]
    fn test_flat_performance_reads_as_improving() {
        let events: Vec<EventRecord> = (0..25).map(|_| perf_event(300.0)).collect();
        let forecast = predictor().predict_performance(&events).unwrap();
        assert_eq!(forecast.trend, PerformanceTrend::Improving);
        assert_eq!(forecast.prediction_7d_ms, 300.0);
    }

    #[test]
    fn test_memory_projection_with_lowered_minimum() {
        // 11 rising samples with a relaxed minimum: slope 10, mean 150
        let config = EngineConfig::builder().min_samples_for_prediction(10).build();
        let predictor = TrendPredictor::new(&config);

        let events: Vec<EventRecord> = (0..11)
            .map(|i| memory_event(100.0 + 10.0 * i as f64))
            .collect();

        let forecast = predictor.predict_memory(&events).unwrap();
        assert_eq!(forecast.current_avg_mb, 150.0);
        assert_eq!(forecast.trend, TrendDirection::Increasing);
        assert_eq!(forecast.prediction_24h_mb, 150.0 + 10.0 * 24.0);
        // Projection far beyond the 128MB default threshold
        assert_eq!(forecast.threshold_breach_risk, BreachRisk::High);
    }

    #[test]
    fn test_stable_memory_has_low_breach_risk() {
        let events: Vec<EventRecord> = (0..30).map(|_| memory_event(64.0)).collect();
        let forecast = predictor().predict_memory(&events).unwrap();
        assert_eq!(forecast.trend, TrendDirection::Decreasing);
        assert_eq!(forecast.threshold_breach_risk, BreachRisk::Low);
    }

    #[test]
    fn test_error_rate_needs_three_days() {
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let mut events = Vec::new();
        for day in 0..2 {
            events.push(EventRecord::at(
                EventType::Exception,
                Severity::Critical,
                Payload::new().with("message", "boom"),
                base + Duration::days(day),
            ));
        }
        assert!(predictor().predict_error_rate(&events).is_none());
    }

    #[test]
    fn test_error_rate_escalating_slope_is_critical() {
        // Daily counts 1, 5, 12: slope 5.5 per day
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let mut events = Vec::new();
        for (day, count) in [(0, 1), (1, 5), (2, 12)] {
            for i in 0..count {
                events.push(EventRecord::at(
                    EventType::Exception,
                    Severity::Critical,
                    Payload::new().with("message", "boom"),
                    base + Duration::days(day) + Duration::minutes(i),
                ));
            }
        }

        let forecast = predictor().predict_error_rate(&events).unwrap();
        assert_eq!(forecast.current_rate, 12);
        assert_eq!(forecast.trend, TrendDirection::Increasing);
        assert_eq!(forecast.severity, ForecastSeverity::Critical);
        assert_eq!(forecast.prediction_7d, 12.0 + 5.5 * 7.0);
    }

    #[test]
    fn test_error_rate_projection_floors_at_zero() {
        // Daily counts 12, 5, 1: negative slope, far-negative raw projection
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let mut events = Vec::new();
        for (day, count) in [(0, 12), (1, 5), (2, 1)] {
            for i in 0..count {
                events.push(EventRecord::at(
                    EventType::Exception,
                    Severity::Critical,
                    Payload::new().with("message", "boom"),
                    base + Duration::days(day) + Duration::minutes(i),
                ));
            }
        }

        let forecast = predictor().predict_error_rate(&events).unwrap();
        assert_eq!(forecast.trend, TrendDirection::Decreasing);
        assert_eq!(forecast.severity, ForecastSeverity::Normal);
        assert_eq!(forecast.prediction_7d, 0.0);
    }

    #[test]
    fn test_downtime_risk_caps_each_contribution() {
        let mut events = Vec::new();
        // 5 critical events outside the exception type
        for _ in 0..5 {
            events.push(EventRecord::new(
                EventType::Memory,
                Severity::Critical,
                Payload::new().with("usage", 512.0),
            ));
        }
        // 80 exceptions at warning severity
        for _ in 0..80 {
            events.push(EventRecord::new(
                EventType::Exception,
                Severity::Warning,
                Payload::new().with("message", "handled"),
            ));
        }
        // 20 severe slowdowns beyond 2x the 2000ms threshold
        for _ in 0..20 {
            events.push(perf_event(5000.0));
        }

        let risk = predictor().assess_downtime_risk(&events).unwrap();
        // min(50, 40) + min(40, 30) + min(40, 30)
        assert_eq!(risk.score, 100.0);
        assert_eq!(risk.level, RiskLevel::Critical);
        assert_eq!(risk.factors.critical_events, 5);
        assert_eq!(risk.factors.exceptions, 80);
        assert_eq!(risk.factors.slow_responses, 20);
    }

    #[test]
    fn test_quiet_window_scores_low_risk() {
        let events = vec![perf_event(120.0), perf_event(130.0)];
        let risk = predictor().assess_downtime_risk(&events).unwrap();
        assert_eq!(risk.score, 0.0);
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn test_empty_window_has_no_predictions() {
        let set = predictor().predict(&[]);
        assert!(set.performance.is_none());
        assert!(set.memory.is_none());
        assert!(set.error_rate.is_none());
        assert!(set.downtime_risk.is_none());
    }
}
