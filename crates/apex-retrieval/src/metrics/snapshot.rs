use std::collections::BTreeMap;

use serde::Serialize;

/// Read-only view of the process-wide metrics recorder, matching the wire
/// shape `apex://metrics/lookup` serves (spec §4.G / §6).
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub avg_latency_ms: f64,
    pub signals_provided: u64,
    pub errors: BTreeMap<String, u64>,
    pub patterns_returned: PatternsReturnedStats,
    pub cache_hit_rate: String,
    pub error_rate: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatternsReturnedStats {
    pub total: u64,
    pub avg_per_request: f64,
    pub max_per_request: u64,
}

impl MetricsSnapshot {
    /// Renders the snapshot as the UTF-8 JSON string `apex://metrics/lookup`
    /// resolves to. Infallible: every field is already serializable.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("MetricsSnapshot fields are always serializable")
    }
}

/// Formats a fraction as a percentage with two decimals, e.g. `0.5 -> "50.00%"`.
pub(super) fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
