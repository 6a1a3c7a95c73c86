//! Trace recording around one logical operation.
//!
//! A trace is opened before the work starts and closed with a status once
//! it ends. [`TracingTelemetry`] records both ends as `tracing` events.

use crate::config::TelemetryConfig;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// An open trace.
#[derive(Debug)]
pub struct TraceContext {
    pub id: Uuid,
    pub name: String,
    started: Instant,
}

impl TraceContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            started: Instant::now(),
        }
    }
}

/// How a traced operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceStatus {
    Success,
    Error(String),
}

impl fmt::Display for TraceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceStatus::Success => f.write_str("Completed"),
            TraceStatus::Error(message) => write!(f, "Failed: {}", message),
        }
    }
}

/// Somewhere traces are sent.
pub trait TelemetrySink: Send + Sync {
    /// Open a trace, or `None` when the sink is not recording.
    fn start_trace(&self, name: &str) -> Option<TraceContext>;

    /// Close a trace previously returned by [`start_trace`](Self::start_trace).
    fn end_trace(&self, trace: TraceContext, status: TraceStatus);
}

/// Records traces as structured log events. Disabled without an API key.
#[derive(Debug, Clone)]
pub struct TracingTelemetry {
    enabled: bool,
}

impl TracingTelemetry {
    pub fn from_config(config: &TelemetryConfig) -> Self {
        let enabled = config.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if !enabled {
            tracing::debug!("telemetry disabled: no API key configured");
        }
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl TelemetrySink for TracingTelemetry {
    fn start_trace(&self, name: &str) -> Option<TraceContext> {
        if !self.enabled {
            return None;
        }
        let trace = TraceContext::new(name);
        tracing::info!(trace_id = %trace.id, trace = %trace.name, "trace started");
        Some(trace)
    }

    fn end_trace(&self, trace: TraceContext, status: TraceStatus) {
        let elapsed = trace.started.elapsed();
        match &status {
            TraceStatus::Success => tracing::info!(
                trace_id = %trace.id,
                trace = %trace.name,
                ?elapsed,
                status = %status,
                "trace ended"
            ),
            TraceStatus::Error(_) => tracing::warn!(
                trace_id = %trace.id,
                trace = %trace.name,
                ?elapsed,
                status = %status,
                "trace ended"
            ),
        }
    }
}

/// A sink that never records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn start_trace(&self, _name: &str) -> Option<TraceContext> {
        None
    }

    fn end_trace(&self, _trace: TraceContext, _status: TraceStatus) {}
}
