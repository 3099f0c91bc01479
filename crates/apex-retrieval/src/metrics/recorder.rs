use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::snapshot::format_percent;
use super::{MetricsSnapshot, PatternsReturnedStats};

const LATENCY_ALPHA: f64 = 0.1;

/// Process-wide, lock-free-for-counters metrics recorder (spec §4.G /
/// §5 "shared, lock-free; atomic counters and a dedicated single-writer
/// stripe for the latency EWMA"). Counters are plain atomics; the latency
/// EWMA and the error-kind tally need a combined read-modify-write so they
/// sit behind a small mutex instead.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    requests_total: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    signals_provided: AtomicU64,
    patterns_returned_total: AtomicU64,
    patterns_returned_max: AtomicU64,
    latency: Mutex<LatencyState>,
    errors: Mutex<HashMap<String, u64>>,
}

#[derive(Debug, Default)]
struct LatencyState {
    ewma_ms: f64,
    initialized: bool,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed, non-cancelled request. `cache_hit` is `None`
    /// when no memoization layer is in use, in which case it always counts
    /// as a miss per spec §4.G.
    pub fn record_request(&self, latency_ms: f64, patterns_returned: u64, signals_provided: bool, cache_hit: Option<bool>) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        match cache_hit {
            Some(true) => {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
            }
            _ => {
                self.cache_misses.fetch_add(1, Ordering::Relaxed);
            }
        }

        if signals_provided {
            self.signals_provided.fetch_add(1, Ordering::Relaxed);
        }

        self.patterns_returned_total.fetch_add(patterns_returned, Ordering::Relaxed);
        self.patterns_returned_max.fetch_max(patterns_returned, Ordering::Relaxed);

        let mut latency = self.latency.lock();
        if latency.initialized {
            latency.ewma_ms = LATENCY_ALPHA * latency_ms + (1.0 - LATENCY_ALPHA) * latency.ewma_ms;
        } else {
            latency.ewma_ms = latency_ms;
            latency.initialized = true;
        }
    }

    /// Records a failed request by its stable `ApexError::kind()` tag.
    /// Cancelled queries must not call this (spec §5: "do not record
    /// latency in metrics" — by convention cancellation skips metrics
    /// entirely, not just latency).
    pub fn record_error(&self, kind: &str) {
        let mut errors = self.errors.lock();
        *errors.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests_total = self.requests_total.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let signals_provided = self.signals_provided.load(Ordering::Relaxed);
        let patterns_total = self.patterns_returned_total.load(Ordering::Relaxed);
        let patterns_max = self.patterns_returned_max.load(Ordering::Relaxed);
        let avg_latency_ms = self.latency.lock().ewma_ms;
        let errors: std::collections::BTreeMap<String, u64> = self.errors.lock().iter().map(|(k, v)| (k.clone(), *v)).collect();

        let errors_total: u64 = errors.values().sum();
        let cache_total = cache_hits + cache_misses;

        let cache_hit_rate = if cache_total == 0 { format_percent(0.0) } else { format_percent(cache_hits as f64 / cache_total as f64) };
        let error_rate = if requests_total == 0 { format_percent(0.0) } else { format_percent(errors_total as f64 / requests_total as f64) };

        let avg_per_request = if requests_total == 0 { 0.0 } else { patterns_total as f64 / requests_total as f64 };

        MetricsSnapshot {
            requests_total,
            cache_hits,
            cache_misses,
            avg_latency_ms,
            signals_provided,
            errors,
            patterns_returned: PatternsReturnedStats {
                total: patterns_total,
                avg_per_request,
                max_per_request: patterns_max,
            },
            cache_hit_rate,
            error_rate,
        }
    }
}
