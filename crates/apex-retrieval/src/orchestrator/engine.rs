use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use apex_core::config::RetrievalConfig;
use apex_core::errors::{ApexError, ApexResult};
use apex_core::store::PatternStore;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::index::BoundedHeap;
use crate::metrics::MetricsRecorder;
use crate::scoring::{score_pattern, tokenize_task, SignalBoosts};

use super::index_snapshot::IndexSnapshot;
use super::request::LookupRequest;
use super::response::{LookupResponse, RankedPattern};
use super::token::CancellationToken;

/// Candidate checkpoints the orchestrator inspects cancellation and the
/// deadline at, per spec §5.
const SCORING_BATCH_SIZE: usize = 64;

enum Checkpoint {
    Continue,
    Cancelled,
    TimedOut,
}

/// Orchestrates a single lookup end to end: validation, candidate union,
/// scoring, bounded-heap ranking, and metrics recording (spec §4.F).
///
/// Reentrant: concurrent queries share the same `IndexSnapshot` under a
/// readers-writer lock. A write (`rebuild_index`) excludes all readers for
/// its duration; in-flight readers that acquired the lock before the write
/// keep working against the snapshot they already hold.
pub struct LookupOrchestrator {
    store: Arc<dyn PatternStore>,
    config: RetrievalConfig,
    index: RwLock<IndexSnapshot>,
    metrics: MetricsRecorder,
    bloom_skips: AtomicU64,
}

impl LookupOrchestrator {
    pub fn new(store: Arc<dyn PatternStore>, config: RetrievalConfig) -> ApexResult<Self> {
        let (patterns, issues) = store.list_all()?;
        for issue in &issues {
            warn!(pattern_id = %issue.id, message = %issue.message, "excluding pattern with invariant violation");
        }
        let index = IndexSnapshot::build(&patterns, &config);
        Ok(Self {
            store,
            config,
            index: RwLock::new(index),
            metrics: MetricsRecorder::new(),
            bloom_skips: AtomicU64::new(0),
        })
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Reloads every pattern from the backing store and atomically swaps
    /// the index. Excludes all readers for the duration of the rebuild.
    pub fn rebuild_index(&self) -> ApexResult<()> {
        let (patterns, issues) = self.store.list_all()?;
        for issue in &issues {
            warn!(pattern_id = %issue.id, message = %issue.message, "excluding pattern with invariant violation");
        }
        let fresh = IndexSnapshot::build(&patterns, &self.config);
        *self.index.write() = fresh;
        Ok(())
    }

    /// Count of candidate paths the bloom prefilter rejected without
    /// consulting the trie. Test-observable per spec §8 scenario 3.
    pub fn bloom_skip_count(&self) -> u64 {
        self.bloom_skips.load(Ordering::Relaxed)
    }

    pub fn lookup(&self, request: &LookupRequest, token: Option<&CancellationToken>) -> ApexResult<LookupResponse> {
        let start = Instant::now();

        if let Err(e) = self.validate(request) {
            self.metrics.record_error(e.kind());
            return Err(e);
        }

        let deadline = request.deadline_ms.map(Duration::from_millis);
        let index = self.index.read();

        let candidate_ids = self.collect_candidates(request, &index);

        match self.check(&start, deadline, token) {
            Checkpoint::Cancelled => {
                self.metrics.record_error(ApexError::Cancelled.kind());
                return Err(ApexError::Cancelled);
            }
            Checkpoint::TimedOut => return self.handle_timeout(request, &start, &BoundedHeap::new(1), 0),
            Checkpoint::Continue => {}
        }

        let task_tokens = tokenize_task(&request.task);
        let signals = SignalBoosts {
            prior_success: request.signals.prior_success.iter().cloned().collect(),
            related: request.signals.related.iter().cloned().collect(),
        };

        let mut heap: BoundedHeap<RankedPattern> = BoundedHeap::new(request.k);
        let ids: Vec<&String> = candidate_ids.iter().collect();

        for batch in ids.chunks(SCORING_BATCH_SIZE) {
            for id in batch {
                let Some(pattern) = index.patterns_by_id.get(id.as_str()) else { continue };
                let breakdown = score_pattern(pattern, &request.paths, &task_tokens, &signals, &self.config);
                heap.push_if_top_k(RankedPattern {
                    id: pattern.id.clone(),
                    kind: pattern.kind(),
                    title: pattern.title.clone(),
                    summary: pattern.summary.clone(),
                    trust_score: pattern.trust_score,
                    snippets: pattern.snippets.clone(),
                    score: breakdown.total,
                });
            }

            match self.check(&start, deadline, token) {
                Checkpoint::Cancelled => {
                    self.metrics.record_error(ApexError::Cancelled.kind());
                    return Err(ApexError::Cancelled);
                }
                Checkpoint::TimedOut => {
                    return self.handle_timeout(request, &start, &heap, candidate_ids.len());
                }
                Checkpoint::Continue => {}
            }
        }

        match self.check(&start, deadline, token) {
            Checkpoint::Cancelled => {
                self.metrics.record_error(ApexError::Cancelled.kind());
                return Err(ApexError::Cancelled);
            }
            Checkpoint::TimedOut => {
                return self.handle_timeout(request, &start, &heap, candidate_ids.len());
            }
            Checkpoint::Continue => {}
        }

        let patterns = heap.into_sorted_desc();
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.metrics.record_request(latency_ms, patterns.len() as u64, !request.signals.is_empty(), None);

        debug!(returned = patterns.len(), candidates = candidate_ids.len(), "lookup complete");

        Ok(LookupResponse { patterns, latency_ms, truncated: false })
    }

    fn validate(&self, request: &LookupRequest) -> ApexResult<()> {
        if request.k < 1 || request.k > self.config.max_k {
            return Err(ApexError::BadRequest(format!("k must be in [1, {}]", self.config.max_k)));
        }
        if request.paths.len() > self.config.max_candidate_paths {
            return Err(ApexError::BadRequest(format!(
                "at most {} candidate paths allowed, got {}",
                self.config.max_candidate_paths,
                request.paths.len()
            )));
        }
        if request.task.len() > self.config.max_task_bytes {
            return Err(ApexError::BadRequest(format!(
                "task string exceeds {} bytes",
                self.config.max_task_bytes
            )));
        }
        if let Some(min_trust) = request.min_trust {
            if !(0.0..=1.0).contains(&min_trust) {
                return Err(ApexError::BadRequest("min_trust must be in [0, 1]".into()));
            }
        }
        Ok(())
    }

    fn collect_candidates(&self, request: &LookupRequest, index: &IndexSnapshot) -> BTreeSet<String> {
        let mut ids = if request.paths.is_empty() {
            index.scalar.all_ids().clone()
        } else {
            let mut union = BTreeSet::new();
            for path in &request.paths {
                if index.bloom.might_match(path) {
                    union.extend(index.trie.find_candidates(path));
                } else {
                    self.bloom_skips.fetch_add(1, Ordering::Relaxed);
                }
            }
            union
        };

        if let Some(kind) = request.type_filter {
            ids = ids.intersection(&index.scalar.ids_of_kind(kind)).cloned().collect();
        }
        for tag in &request.tags {
            ids = ids.intersection(&index.scalar.ids_with_tag(tag)).cloned().collect();
        }
        if let Some(min_trust) = request.min_trust {
            ids = ids.intersection(&index.scalar.ids_with_min_trust(min_trust)).cloned().collect();
        }
        for excluded in &request.exclude {
            ids.remove(excluded);
        }

        ids
    }

    fn check(&self, start: &Instant, deadline: Option<Duration>, token: Option<&CancellationToken>) -> Checkpoint {
        if token.map(|t| t.is_cancelled()).unwrap_or(false) {
            return Checkpoint::Cancelled;
        }
        if let Some(deadline) = deadline {
            if start.elapsed() >= deadline {
                return Checkpoint::TimedOut;
            }
        }
        Checkpoint::Continue
    }

    /// Deadline exceeded: per spec §4.F, surface `TimeoutError` unless the
    /// caller set `partial_ok`, in which case whatever the heap currently
    /// holds is returned with `truncated: true`. Neither branch updates the
    /// latency EWMA.
    fn handle_timeout(
        &self,
        request: &LookupRequest,
        start: &Instant,
        heap: &BoundedHeap<RankedPattern>,
        _candidates_seen: usize,
    ) -> ApexResult<LookupResponse> {
        let elapsed_ms = start.elapsed().as_millis() as u64;
        self.metrics.record_error(ApexError::Timeout { elapsed_ms }.kind());

        if request.partial_ok {
            let latency_ms = elapsed_ms as f64;
            let patterns = heap.to_sorted_desc().into_iter().cloned().collect();
            Ok(LookupResponse { patterns, latency_ms, truncated: true })
        } else {
            Err(ApexError::Timeout { elapsed_ms })
        }
    }
}
