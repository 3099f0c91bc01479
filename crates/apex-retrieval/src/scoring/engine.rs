use std::collections::HashSet;

use apex_core::config::RetrievalConfig;
use apex_core::model::Pattern;

use crate::index::glob_matches;

use super::{tokenize_task, SignalBoosts};

/// Per-component score, retained for debugging and tests; only the
/// composite `total` is surfaced on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub path_score: f64,
    pub text_score: f64,
    pub signal_score: f64,
    pub trust_score: f64,
    pub total: f64,
}

/// Fraction of `pattern`'s declared globs that match `path`, via the same
/// matching rules the trie uses for candidate generation.
fn path_score_for_one(pattern: &Pattern, path: &str) -> f64 {
    if pattern.paths.is_empty() {
        return 0.0;
    }
    let matching = pattern.paths.iter().filter(|glob| glob_matches(glob, path)).count();
    matching as f64 / pattern.paths.len() as f64
}

fn path_score(pattern: &Pattern, request_paths: &[String]) -> f64 {
    if request_paths.is_empty() {
        return 0.0;
    }
    let sum: f64 = request_paths.iter().map(|p| path_score_for_one(pattern, p)).sum();
    sum / request_paths.len() as f64
}

fn text_score(pattern: &Pattern, task_tokens: &HashSet<String>) -> f64 {
    let mut pattern_text = String::new();
    pattern_text.push_str(&pattern.title);
    pattern_text.push(' ');
    pattern_text.push_str(&pattern.summary);
    pattern_text.push(' ');
    pattern_text.push_str(&pattern.tags.iter().cloned().collect::<Vec<_>>().join(" "));

    let pattern_tokens = tokenize_task(&pattern_text);
    super::text::jaccard(task_tokens, &pattern_tokens)
}

/// Composite relevance score for a (request, pattern) pair, in [0, 1].
/// Pure function of its inputs — scoring the same pair twice yields a
/// bitwise-identical result.
pub fn score_pattern(
    pattern: &Pattern,
    request_paths: &[String],
    task_tokens: &HashSet<String>,
    signals: &SignalBoosts,
    config: &RetrievalConfig,
) -> ScoreBreakdown {
    let path = path_score(pattern, request_paths);
    let text = text_score(pattern, task_tokens);
    let signal = signals.boost_for(&pattern.id);
    let trust = pattern.trust_score;

    let mut total =
        config.weight_path * path + config.weight_text * text + config.weight_signal * signal + config.weight_trust * trust;

    if pattern.deprecated {
        total *= config.deprecated_score_multiplier;
    }

    ScoreBreakdown {
        path_score: path,
        text_score: text,
        signal_score: signal,
        trust_score: trust,
        total: total.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_core::model::{CodebaseFields, PatternContent, SemVer, Usage};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn sample() -> Pattern {
        let now = Utc::now();
        Pattern {
            id: "PAT:UI:BUTTON".into(),
            content: PatternContent::Codebase(CodebaseFields {}),
            title: "Button pattern".into(),
            summary: "How we build buttons".into(),
            trust_score: 0.72,
            usage: Usage { successes: 10, failures: 0, last_used: None },
            snippets: vec![],
            evidence: vec![],
            tags: ["ui".to_string()].into_iter().collect(),
            paths: ["src/ui/**".to_string()].into_iter().collect(),
            signature: None,
            deprecated: false,
            version: SemVer::default(),
            created: now,
            updated: now,
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let pattern = sample();
        let config = RetrievalConfig::default();
        let tokens = tokenize_task("fix the button click handler");
        let signals = SignalBoosts::default();
        let paths = vec!["src/ui/Button.tsx".to_string()];

        let a = score_pattern(&pattern, &paths, &tokens, &signals, &config);
        let b = score_pattern(&pattern, &paths, &tokens, &signals, &config);
        assert_eq!(a.total, b.total);
    }

    #[test]
    fn exact_path_hit_scores_at_least_half() {
        let pattern = sample();
        let config = RetrievalConfig::default();
        let tokens = HashSet::new();
        let signals = SignalBoosts::default();
        let paths = vec!["src/ui/Button.tsx".to_string()];

        let score = score_pattern(&pattern, &paths, &tokens, &signals, &config);
        assert!(score.total >= 0.5, "got {}", score.total);
    }

    #[test]
    fn deprecated_damping_can_invert_ranking() {
        let config = RetrievalConfig::default();
        let tokens = HashSet::new();
        let signals = SignalBoosts::default();

        let mut deprecated = sample();
        deprecated.deprecated = true;
        deprecated.trust_score = 0.8;
        deprecated.paths = BTreeSet::new();
        deprecated.usage = Usage { successes: 100, failures: 0, last_used: None };

        let mut fresh = sample();
        fresh.trust_score = 0.25;
        fresh.paths = BTreeSet::new();

        let score_deprecated = score_pattern(&deprecated, &[], &tokens, &signals, &config);
        let score_fresh = score_pattern(&fresh, &[], &tokens, &signals, &config);
        assert!(score_fresh.total > score_deprecated.total);
    }

    #[test]
    fn no_request_paths_gives_zero_path_score() {
        let pattern = sample();
        let tokens = HashSet::new();
        let signals = SignalBoosts::default();
        let config = RetrievalConfig::default();
        let score = score_pattern(&pattern, &[], &tokens, &signals, &config);
        assert_eq!(score.path_score, 0.0);
    }
}
