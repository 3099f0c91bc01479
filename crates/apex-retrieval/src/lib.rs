//! # apex-retrieval
//!
//! The indexed, ranked retrieval engine: bloom prefilter, path trie,
//! bounded top-K heap, scoring, the lookup orchestrator, and the metrics
//! recorder. Built from an `apex_core::store::PatternStore` snapshot.

pub mod index;
pub mod metrics;
pub mod orchestrator;
pub mod scoring;

pub use index::{BloomPrefilter, BoundedHeap, PathTrie};
pub use metrics::{MetricsRecorder, MetricsSnapshot};
pub use orchestrator::{
    CancellationToken, LookupOrchestrator, LookupRequest, LookupResponse, RankedPattern,
};
pub use scoring::score_pattern;

/// Stable URI the metrics snapshot is addressable by (spec §6).
pub const METRICS_URI: &str = "apex://metrics/lookup";
