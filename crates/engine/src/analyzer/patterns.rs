//! Pattern analyzer
//!
//! Mines the recent history window for recurring usage patterns: peak load
//! hours, the slowest endpoints, the memory usage trend, and recurring error
//! messages with a frequency classification.

use chrono::{DateTime, Timelike, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use super::types::{
    EndpointStat, ErrorFrequency, ErrorPattern, MemoryTrend, PatternSnapshot, PeakHours,
    TrendDirection,
};
use crate::event::{EventRecord, EventType};
use crate::stats::{least_squares_slope, round2};

/// A bucket is a peak hour when its count exceeds this multiple of the average
const PEAK_MULTIPLIER: f64 = 1.5;

/// At most this many endpoints are reported
const SLOW_ENDPOINT_CAP: usize = 10;

/// Hours in the seven-day projection horizon
const HOURS_7D: f64 = 168.0;

/// Mines usage patterns from an ordered event window
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternAnalyzer;

impl PatternAnalyzer {
    /// Create an analyzer
    pub fn new() -> Self {
        Self
    }

    /// Compute a fresh pattern snapshot over the given window
    pub fn analyze(&self, events: &[EventRecord]) -> PatternSnapshot {
        let snapshot = PatternSnapshot {
            peak_hours: self.identify_peak_hours(events),
            slow_endpoints: self.identify_slow_endpoints(events),
            memory_trend: self.analyze_memory_trend(events),
            error_patterns: self.analyze_error_patterns(events),
        };

        debug!(
            peak_hours = snapshot.peak_hours.hours.len(),
            slow_endpoints = snapshot.slow_endpoints.len(),
            error_patterns = snapshot.error_patterns.len(),
            "pattern analysis complete"
        );

        snapshot
    }

    /// Bucket events by hour of day and flag buckets well above the average.
    ///
    /// The average is taken over hours that saw at least one event, not over
    /// all 24, so a sparse history does not dilute the baseline.
    fn identify_peak_hours(&self, events: &[EventRecord]) -> PeakHours {
        let mut buckets: BTreeMap<u32, usize> = BTreeMap::new();
        for event in events {
            *buckets.entry(event.timestamp.hour()).or_insert(0) += 1;
        }

        if buckets.is_empty() {
            return PeakHours::empty();
        }

        let average = buckets.values().sum::<usize>() as f64 / buckets.len() as f64;

        let mut peaks: Vec<(u32, usize)> = buckets
            .into_iter()
            .filter(|&(_, count)| count as f64 > average * PEAK_MULTIPLIER)
            .collect();
        peaks.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let peak_load = peaks.first().map(|&(_, count)| count as f64).unwrap_or(0.0);

        PeakHours {
            hours: peaks.into_iter().map(|(hour, _)| hour).collect(),
            average_load: round2(average),
            peak_load,
        }
    }

    /// Rank endpoints by average response time, worst first, capped at ten
    fn identify_slow_endpoints(&self, events: &[EventRecord]) -> Vec<EndpointStat> {
        struct Acc {
            count: usize,
            total: f64,
            max: f64,
        }

        let mut groups: BTreeMap<String, Acc> = BTreeMap::new();

        for event in events {
            if event.event_type != EventType::Performance {
                continue;
            }
            // Records without a URL cannot be attributed to an endpoint
            let Some(url) = event.payload.text("url") else {
                continue;
            };
            let time = event.payload.number("response_time").unwrap_or(0.0);

            let acc = groups.entry(url.to_string()).or_insert(Acc {
                count: 0,
                total: 0.0,
                max: 0.0,
            });
            acc.count += 1;
            acc.total += time;
            if time > acc.max {
                acc.max = time;
            }
        }

        let mut endpoints: Vec<EndpointStat> = groups
            .into_iter()
            .map(|(url, acc)| EndpointStat {
                url,
                count: acc.count,
                avg_time_ms: round2(acc.total / acc.count as f64),
                max_time_ms: acc.max,
            })
            .collect();

        endpoints.sort_by(|a, b| {
            b.avg_time_ms
                .partial_cmp(&a.avg_time_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.url.cmp(&b.url))
        });
        endpoints.truncate(SLOW_ENDPOINT_CAP);

        endpoints
    }

    /// Fit the memory usage sequence and project one week ahead
    fn analyze_memory_trend(&self, events: &[EventRecord]) -> Option<MemoryTrend> {
        let usages: Vec<f64> = events
            .iter()
            .filter(|event| event.event_type == EventType::Memory)
            .map(|event| event.payload.number("usage").unwrap_or(0.0))
            .collect();

        if usages.is_empty() {
            return None;
        }

        let avg = usages.iter().sum::<f64>() / usages.len() as f64;
        let slope = least_squares_slope(&usages);
        let direction = if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };

        Some(MemoryTrend {
            current_avg_mb: round2(avg),
            direction,
            rate: round2(slope.abs()),
            prediction_7d_mb: round2(avg + slope * HOURS_7D),
        })
    }

    /// Group exception messages and classify how often each recurs
    fn analyze_error_patterns(&self, events: &[EventRecord]) -> Vec<ErrorPattern> {
        struct Group {
            count: usize,
            first_seen: DateTime<Utc>,
            last_seen: DateTime<Utc>,
        }

        let mut groups: BTreeMap<String, Group> = BTreeMap::new();

        for event in events {
            if event.event_type != EventType::Exception {
                continue;
            }
            let Some(message) = event.payload.text("message") else {
                continue;
            };

            groups
                .entry(message.to_string())
                .and_modify(|group| {
                    group.count += 1;
                    if event.timestamp < group.first_seen {
                        group.first_seen = event.timestamp;
                    }
                    if event.timestamp > group.last_seen {
                        group.last_seen = event.timestamp;
                    }
                })
                .or_insert(Group {
                    count: 1,
                    first_seen: event.timestamp,
                    last_seen: event.timestamp,
                });
        }

        let mut patterns: Vec<ErrorPattern> = groups
            .into_iter()
            .map(|(message, group)| ErrorPattern {
                frequency: classify_frequency(group.count, group.first_seen, group.last_seen),
                message,
                count: group.count,
                first_seen: group.first_seen,
                last_seen: group.last_seen,
            })
            .collect();

        patterns.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.message.cmp(&b.message)));
        patterns
    }
}

/// Classify how often an error recurs from its count and observed span.
///
/// A span of zero whole hours means every occurrence landed inside the same
/// hour; that is reported as `Multiple` regardless of count since no rate
/// can be derived.
fn classify_frequency(
    count: usize,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
) -> ErrorFrequency {
    if count < 2 {
        return ErrorFrequency::Rare;
    }

    let span_hours = (last_seen - first_seen).num_hours();
    if span_hours == 0 {
        return ErrorFrequency::Multiple;
    }

    let rate = count as f64 / span_hours as f64;
    if rate > 1.0 {
        ErrorFrequency::Frequent
    } else if rate > 0.1 {
        ErrorFrequency::Moderate
    } else {
        ErrorFrequency::Rare
    }
}
