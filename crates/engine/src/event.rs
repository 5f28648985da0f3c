//! Event model for the telemetry engine
//!
//! Defines the immutable event record produced by the monitoring probes and
//! consumed by the analysis pipeline, along with the type and severity
//! taxonomies shared across the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::EngineConfig;

/// Kind of observation an event record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Database query timing
    Query,
    /// Memory usage sample
    Memory,
    /// Request/response latency
    Performance,
    /// Captured exception
    Exception,
    /// Security signal (suspicious request, failed login, ...)
    Security,
    /// Engine-emitted insight event (anomaly consolidation, notices)
    Insight,
}

impl EventType {
    /// String representation used in logs and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Query => "query",
            EventType::Memory => "memory",
            EventType::Performance => "performance",
            EventType::Exception => "exception",
            EventType::Security => "security",
            EventType::Insight => "insight",
        }
    }
}

/// Severity of an event record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Routine observation
    Info,
    /// Threshold exceeded, worth reviewing
    Warning,
    /// Needs attention
    Critical,
}

impl Severity {
    /// String representation used in logs and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Derive a severity from an event's payload and the configured thresholds.
    ///
    /// Query timings escalate at 1x/3x the query-time threshold, memory
    /// samples at 1x/1.5x the memory threshold, and exceptions are always
    /// critical. Everything else is informational. Ingestion-side callers use
    /// this when appending records that carry no explicit severity.
    pub fn classify(event_type: EventType, payload: &Payload, config: &EngineConfig) -> Severity {
        match event_type {
            EventType::Query => match payload.number("time") {
                Some(time) if time > config.query_time_threshold_ms * 3.0 => Severity::Critical,
                Some(time) if time > config.query_time_threshold_ms => Severity::Warning,
                _ => Severity::Info,
            },
            EventType::Memory => match payload.number("usage") {
                Some(usage) if usage > config.memory_threshold_mb * 1.5 => Severity::Critical,
                Some(usage) if usage > config.memory_threshold_mb => Severity::Warning,
                _ => Severity::Info,
            },
            EventType::Exception => Severity::Critical,
            _ => Severity::Info,
        }
    }
}

/// Scalar key/value payload attached to an event record.
///
/// Values are JSON scalars; readers use the typed accessors, which treat a
/// missing or mistyped key as absent rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, consuming and returning the payload
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert an entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Read a numeric field
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Read a string field
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload carries no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One observed measurement, immutable once created.
///
/// Records are owned by the event store; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Kind of observation
    pub event_type: EventType,

    /// Severity assigned at ingestion time
    pub severity: Severity,

    /// When the observation was made
    pub timestamp: DateTime<Utc>,

    /// Scalar measurement data
    pub payload: Payload,
}

impl EventRecord {
    /// Create a record timestamped now
    pub fn new(event_type: EventType, severity: Severity, payload: Payload) -> Self {
        Self::at(event_type, severity, payload, Utc::now())
    }

    /// Create a record with an explicit timestamp
    pub fn at(
        event_type: EventType,
        severity: Severity,
        payload: Payload,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            severity,
            timestamp,
            payload,
        }
    }
}
