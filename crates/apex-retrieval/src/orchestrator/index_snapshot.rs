use std::collections::HashMap;

use apex_core::config::RetrievalConfig;
use apex_core::model::Pattern;

use crate::index::{tokenize_path, BloomPrefilter, PathTrie, ScalarIndex};

/// A consistent, read-only view of the retrieval index built from a single
/// `PatternStore::list_all` call. Queries in flight hold a read guard on
/// the surrounding lock and never see a mix of pre- and post-write state
/// (spec §5's ordering guarantee).
pub(super) struct IndexSnapshot {
    pub(super) bloom: BloomPrefilter,
    pub(super) trie: PathTrie,
    pub(super) scalar: ScalarIndex,
    pub(super) patterns_by_id: HashMap<String, Pattern>,
}

impl IndexSnapshot {
    pub(super) fn build(patterns: &[Pattern], config: &RetrievalConfig) -> Self {
        let mut trie = PathTrie::new();
        let mut literal_tokens: Vec<String> = Vec::new();
        let mut always_match = false;

        for pattern in patterns {
            for glob in &pattern.paths {
                trie.insert(glob, &pattern.id);

                let glob_literal_tokens: Vec<String> =
                    tokenize_path(glob).into_iter().filter(|t| !is_wildcard_token(t)).collect();
                if glob_literal_tokens.is_empty() {
                    // A fully wildcarded glob (e.g. "**") can match a path
                    // sharing no literal token with anything indexed.
                    always_match = true;
                }
                literal_tokens.extend(glob_literal_tokens);
            }
        }

        let bloom =
            BloomPrefilter::build(literal_tokens.iter().map(|s| s.as_str()), config.bloom_target_fp_rate, always_match);
        let scalar = ScalarIndex::build(patterns);
        let patterns_by_id = patterns.iter().map(|p| (p.id.clone(), p.clone())).collect();

        Self { bloom, trie, scalar, patterns_by_id }
    }
}

fn is_wildcard_token(token: &str) -> bool {
    token.contains('*') || token.contains('?')
}
