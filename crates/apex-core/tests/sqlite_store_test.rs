//! SQLite store integration tests against an on-disk database, exercising
//! the migration runner and pragmas the way `open_in_memory` never does.

use std::collections::BTreeSet;

use apex_core::model::{CodebaseFields, Pattern, PatternContent, SemVer, Usage};
use apex_core::store::{PatternStore, SqlitePatternStore};
use chrono::Utc;

fn sample(id: &str) -> Pattern {
    let now = Utc::now();
    let mut pattern = Pattern {
        id: id.to_string(),
        content: PatternContent::Codebase(CodebaseFields {}),
        title: "on-disk pattern".into(),
        summary: "exercises the real file-backed store".into(),
        trust_score: 0.0,
        usage: Usage { successes: 4, failures: 1, last_used: None },
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

#[test]
fn reopening_the_same_file_preserves_data_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("apex.db");

    {
        let store = SqlitePatternStore::open(&db_path).unwrap();
        store.insert(&sample("PAT:A:X")).unwrap();
    }

    let store = SqlitePatternStore::open(&db_path).unwrap();
    let fetched = store.get("PAT:A:X").unwrap();
    assert!(fetched.is_some());
}

#[test]
fn reopening_runs_migrations_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("apex.db");

    SqlitePatternStore::open(&db_path).unwrap();
    // Second open must not fail or re-apply already-applied migrations.
    let store = SqlitePatternStore::open(&db_path).unwrap();
    store.insert(&sample("PAT:B:Y")).unwrap();
    assert!(store.get("PAT:B:Y").unwrap().is_some());
}

#[test]
fn usage_history_accumulates_across_record_outcome_calls() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqlitePatternStore::open(dir.path().join("apex.db")).unwrap();
    let pattern = sample("PAT:C:Z");
    store.insert(&pattern).unwrap();

    for _ in 0..3 {
        store.record_outcome("PAT:C:Z", true, Utc::now()).unwrap();
    }
    store.record_outcome("PAT:C:Z", false, Utc::now()).unwrap();

    let fetched = store.get("PAT:C:Z").unwrap().unwrap();
    assert_eq!(fetched.usage.successes, pattern.usage.successes + 3);
    assert_eq!(fetched.usage.failures, pattern.usage.failures + 1);
    assert!(fetched.trust_score_matches_usage());
}
