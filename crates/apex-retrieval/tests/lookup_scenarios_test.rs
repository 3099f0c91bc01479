//! End-to-end lookup scenarios, one per literal case in spec §8.

use std::collections::BTreeSet;
use std::sync::Arc;

use apex_core::config::RetrievalConfig;
use apex_core::errors::ApexError;
use apex_core::model::{CodebaseFields, Pattern, PatternContent, SemVer, Usage};
use apex_core::store::{PatternStore, SqlitePatternStore};
use apex_retrieval::{CancellationToken, LookupOrchestrator, LookupRequest};
use chrono::Utc;

fn sample_pattern(id: &str, paths: &[&str], successes: u64, failures: u64) -> Pattern {
    let now = Utc::now();
    let usage = Usage { successes, failures, last_used: None };
    let mut pattern = Pattern {
        id: id.to_string(),
        content: PatternContent::Codebase(CodebaseFields {}),
        title: format!("{id} title"),
        summary: format!("{id} summary"),
        trust_score: 0.0,
        usage,
        snippets: vec![],
        evidence: vec![],
        tags: BTreeSet::new(),
        paths: paths.iter().map(|s| s.to_string()).collect(),
        signature: None,
        deprecated: false,
        version: SemVer::default(),
        created: now,
        updated: now,
    };
    pattern.recompute_trust();
    pattern
}

fn orchestrator_with(patterns: &[Pattern]) -> LookupOrchestrator {
    let store = SqlitePatternStore::open_in_memory().unwrap();
    for pattern in patterns {
        store.insert(pattern).unwrap();
    }
    LookupOrchestrator::new(Arc::new(store), RetrievalConfig::default()).unwrap()
}

#[test]
fn scenario_1_empty_store_returns_no_patterns() {
    let orchestrator = orchestrator_with(&[]);
    let request = LookupRequest::new("anything");

    let response = orchestrator.lookup(&request, None).unwrap();

    assert!(response.patterns.is_empty());
    assert!(response.latency_ms >= 0.0);
    assert_eq!(orchestrator.metrics().snapshot().requests_total, 1);
}

#[test]
fn scenario_2_exact_path_hit_ranks_first() {
    let pattern = sample_pattern("PAT:UI:BUTTON", &["src/ui/**"], 10, 0);
    assert!((pattern.trust_score - 0.72).abs() < 0.01);

    let orchestrator = orchestrator_with(&[pattern]);
    let mut request = LookupRequest::new("fix button click handler");
    request.paths = vec!["src/ui/Button.tsx".to_string()];
    request.k = 5;

    let response = orchestrator.lookup(&request, None).unwrap();

    assert_eq!(response.patterns.first().unwrap().id, "PAT:UI:BUTTON");
    assert!(response.patterns.first().unwrap().score >= 0.5);
}

#[test]
fn scenario_3_bloom_rejects_skip_the_trie() {
    let pattern = sample_pattern("PAT:UI:BUTTON", &["src/ui/**"], 10, 0);
    let orchestrator = orchestrator_with(&[pattern]);

    let mut request = LookupRequest::new("unrelated task");
    request.paths = vec!["docs/readme.md".to_string()];

    let response = orchestrator.lookup(&request, None).unwrap();

    assert!(response.patterns.is_empty());
    assert_eq!(orchestrator.bloom_skip_count(), 1);
}

#[test]
fn scenario_4_signal_boost_breaks_a_path_score_tie() {
    let a = sample_pattern("PAT:A:X", &[], 5, 0);
    let b = sample_pattern("PAT:B:Y", &[], 5, 0);
    let orchestrator = orchestrator_with(&[a, b]);

    let mut request = LookupRequest::new("same task text for both");
    request.signals.prior_success = ["PAT:A:X".to_string()].into_iter().collect();
    request.k = 10;

    let response = orchestrator.lookup(&request, None).unwrap();

    let ids: Vec<&str> = response.patterns.iter().map(|p| p.id.as_str()).collect();
    let pos_a = ids.iter().position(|&id| id == "PAT:A:X").unwrap();
    let pos_b = ids.iter().position(|&id| id == "PAT:B:Y").unwrap();
    assert!(pos_a < pos_b);
}

#[test]
fn scenario_5_deprecated_damping_inverts_ranking() {
    let mut deprecated = sample_pattern("PAT:OLD:X", &[], 100, 0);
    deprecated.deprecated = true;
    deprecated.recompute_trust();

    let fresh = sample_pattern("PAT:NEW:Y", &[], 10, 0);

    let orchestrator = orchestrator_with(&[deprecated, fresh]);
    let request = LookupRequest::new("");

    let response = orchestrator.lookup(&request, None).unwrap();

    let ids: Vec<&str> = response.patterns.iter().map(|p| p.id.as_str()).collect();
    let pos_new = ids.iter().position(|&id| id == "PAT:NEW:Y").unwrap();
    let pos_old = ids.iter().position(|&id| id == "PAT:OLD:X").unwrap();
    assert!(pos_new < pos_old);
}

#[test]
fn scenario_6_zero_deadline_times_out_without_latency_update() {
    let pattern = sample_pattern("PAT:UI:BUTTON", &["src/ui/**"], 10, 0);
    let orchestrator = orchestrator_with(&[pattern]);

    let mut request = LookupRequest::new("anything");
    request.deadline_ms = Some(0);
    request.partial_ok = false;

    let result = orchestrator.lookup(&request, None);

    assert!(matches!(result, Err(ApexError::Timeout { .. })));
    let snapshot = orchestrator.metrics().snapshot();
    assert_eq!(snapshot.errors.get("timeout"), Some(&1));
    assert_eq!(snapshot.requests_total, 0);
}

#[test]
fn cancellation_token_short_circuits_a_lookup() {
    let pattern = sample_pattern("PAT:UI:BUTTON", &["src/ui/**"], 10, 0);
    let orchestrator = orchestrator_with(&[pattern]);

    let token = CancellationToken::new();
    token.cancel();
    let request = LookupRequest::new("anything");

    let result = orchestrator.lookup(&request, Some(&token));
    assert!(matches!(result, Err(ApexError::Cancelled)));
}
