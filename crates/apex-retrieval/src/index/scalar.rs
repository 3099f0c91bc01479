use std::collections::{BTreeMap, BTreeSet, HashMap};

use apex_core::model::{Pattern, PatternKind};

/// Ancillary indexes over scalar pattern attributes — type, tags, trust —
/// used to restrict the candidate set alongside the trie/bloom path
/// candidates.
pub struct ScalarIndex {
    all_ids: BTreeSet<String>,
    by_kind: HashMap<PatternKind, BTreeSet<String>>,
    by_tag: HashMap<String, BTreeSet<String>>,
    trust_by_id: BTreeMap<String, f64>,
}

impl ScalarIndex {
    pub fn build(patterns: &[Pattern]) -> Self {
        let mut all_ids = BTreeSet::new();
        let mut by_kind: HashMap<PatternKind, BTreeSet<String>> = HashMap::new();
        let mut by_tag: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut trust_by_id = BTreeMap::new();

        for pattern in patterns {
            all_ids.insert(pattern.id.clone());
            by_kind.entry(pattern.kind()).or_default().insert(pattern.id.clone());
            for tag in &pattern.tags {
                by_tag.entry(tag.clone()).or_default().insert(pattern.id.clone());
            }
            trust_by_id.insert(pattern.id.clone(), pattern.trust_score);
        }

        Self { all_ids, by_kind, by_tag, trust_by_id }
    }

    pub fn all_ids(&self) -> &BTreeSet<String> {
        &self.all_ids
    }

    pub fn ids_of_kind(&self, kind: PatternKind) -> BTreeSet<String> {
        self.by_kind.get(&kind).cloned().unwrap_or_default()
    }

    pub fn ids_with_tag(&self, tag: &str) -> BTreeSet<String> {
        self.by_tag.get(tag).cloned().unwrap_or_default()
    }

    pub fn ids_with_min_trust(&self, min_trust: f64) -> BTreeSet<String> {
        self.trust_by_id
            .iter()
            .filter(|(_, &score)| score >= min_trust)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_core::model::{CodebaseFields, PatternContent, SemVer, Usage};
    use chrono::Utc;

    fn sample(id: &str, kind_tags: &[&str], trust: f64) -> Pattern {
        let now = Utc::now();
        Pattern {
            id: id.into(),
            content: PatternContent::Codebase(CodebaseFields {}),
            title: "t".into(),
            summary: "s".into(),
            trust_score: trust,
            usage: Usage { successes: 0, failures: 0, last_used: None },
            snippets: vec![],
            evidence: vec![],
            tags: kind_tags.iter().map(|s| s.to_string()).collect(),
            paths: ["src/**".into()].into_iter().collect(),
            signature: None,
            deprecated: false,
            version: SemVer::default(),
            created: now,
            updated: now,
        }
    }

    #[test]
    fn filters_by_tag_and_trust() {
        let patterns = vec![sample("PAT:A:X", &["ui"], 0.9), sample("PAT:B:Y", &["backend"], 0.1)];
        let idx = ScalarIndex::build(&patterns);
        assert_eq!(idx.ids_with_tag("ui").len(), 1);
        assert_eq!(idx.ids_with_min_trust(0.5).len(), 1);
        assert_eq!(idx.ids_of_kind(PatternKind::Codebase).len(), 2);
    }
}
