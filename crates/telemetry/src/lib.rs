//! Telemetry for the growth metrics pipeline.
//!
//! Structured logs via `tracing`, plus an in-process metrics registry whose
//! snapshot is logged at the end of every run.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;

/// Serializes a metrics snapshot for a single structured log field.
pub fn snapshot_json(snapshot: &MetricsSnapshot) -> String {
    serde_json::to_string(snapshot).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}
