//! Property checks that span the whole retrieval engine rather than a
//! single index structure (those live inline next to their modules).

use std::collections::BTreeSet;
use std::sync::Arc;

use apex_core::config::RetrievalConfig;
use apex_core::model::{CodebaseFields, Pattern, PatternContent, SemVer, Usage};
use apex_core::store::{PatternStore, SqlitePatternStore};
use apex_retrieval::{LookupOrchestrator, LookupRequest};
use chrono::Utc;
use proptest::prelude::*;

fn pattern_with(id: &str, successes: u64, failures: u64) -> Pattern {
    let now = Utc::now();
    let mut pattern = Pattern {
        id: id.to_string(),
        content: PatternContent::Codebase(CodebaseFields {}),
        title: format!("{id} title"),
        summary: "summary text for the pattern".into(),
        trust_score: 0.0,
        usage: Usage { successes, failures, last_used: None },
        snippets: vec![],
        evidence: vec![],
        tags: BTreeSet::new(),
        paths: ["src/**".to_string()].into_iter().collect(),
        signature: None,
        deprecated: false,
        version: SemVer::default(),
        created: now,
        updated: now,
    };
    pattern.recompute_trust();
    pattern
}

proptest! {
    #[test]
    fn repeated_lookups_with_the_same_request_are_bitwise_identical(
        k in 1usize..20,
        count in 0usize..15,
    ) {
        let store = SqlitePatternStore::open_in_memory().unwrap();
        for i in 0..count {
            store.insert(&pattern_with(&format!("PAT:X:{i:03}"), (i as u64) % 20, (i as u64) % 5)).unwrap();
        }
        let orchestrator = LookupOrchestrator::new(Arc::new(store), RetrievalConfig::default()).unwrap();

        let mut request = LookupRequest::new("fix the bug in the parser");
        request.k = k;

        let first = orchestrator.lookup(&request, None).unwrap();
        let second = orchestrator.lookup(&request, None).unwrap();

        let first_scores: Vec<f64> = first.patterns.iter().map(|p| p.score).collect();
        let second_scores: Vec<f64> = second.patterns.iter().map(|p| p.score).collect();
        prop_assert_eq!(first_scores, second_scores);
        prop_assert!(first.patterns.len() <= k);
    }
}
