use crate::model::{Pattern, PatternKind};

/// A non-blocking semantic observation about an otherwise structurally
/// valid pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticWarning {
    pub code: &'static str,
    pub message: String,
}

impl SemanticWarning {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

const MAX_RECOMMENDED_SNIPPET_LINES: usize = 200;

/// Phase 2: semantic validation. Everything here is a warning — the
/// structural phase already rejected the one semantic condition treated as
/// an error (FAILURE without signature or evidence).
pub fn validate_semantic(pattern: &Pattern) -> Vec<SemanticWarning> {
    let mut warnings = Vec::new();

    let total_lines: usize = pattern.snippets.iter().map(|s| s.line_count()).sum();
    if total_lines > MAX_RECOMMENDED_SNIPPET_LINES {
        warnings.push(SemanticWarning::new(
            "snippets_too_long",
            format!("total snippet lines ({total_lines}) exceed the recommended {MAX_RECOMMENDED_SNIPPET_LINES}"),
        ));
    }

    if pattern.kind() == PatternKind::Anti && pattern.evidence.is_empty() {
        warnings.push(SemanticWarning::new(
            "anti_without_evidence",
            "ANTI patterns should carry evidence",
        ));
    }

    if pattern.trust_score > 0.8 && pattern.usage.successes < 3 {
        warnings.push(SemanticWarning::new(
            "suspicious_trust_score",
            format!(
                "trust_score {:.2} with only {} successes is suspicious",
                pattern.trust_score, pattern.usage.successes
            ),
        ));
    }

    if pattern.deprecated && pattern.trust_score > 0.5 {
        warnings.push(SemanticWarning::new(
            "deprecated_but_trusted",
            format!("deprecated pattern has trust_score {:.2} > 0.5", pattern.trust_score),
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodebaseFields, PatternContent, SemVer, Snippet, Usage};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn base() -> Pattern {
        Pattern {
            id: "PAT:UI:BUTTON".into(),
            content: PatternContent::Codebase(CodebaseFields {}),
            title: "t".into(),
            summary: "s".into(),
            trust_score: 0.0,
            usage: Usage::default(),
            snippets: vec![],
            evidence: vec![],
            tags: BTreeSet::new(),
            paths: ["src/**".to_string()].into_iter().collect(),
            signature: None,
            deprecated: false,
            version: SemVer::default(),
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn flags_long_snippets() {
        let mut p = base();
        p.snippets.push(Snippet {
            language: "rust".into(),
            code: "x\n".repeat(250),
        });
        let warnings = validate_semantic(&p);
        assert!(warnings.iter().any(|w| w.code == "snippets_too_long"));
    }

    #[test]
    fn flags_deprecated_but_trusted() {
        let mut p = base();
        p.deprecated = true;
        p.trust_score = 0.9;
        let warnings = validate_semantic(&p);
        assert!(warnings.iter().any(|w| w.code == "deprecated_but_trusted"));
    }

    #[test]
    fn clean_pattern_has_no_warnings() {
        let p = base();
        assert!(validate_semantic(&p).is_empty());
    }
}
