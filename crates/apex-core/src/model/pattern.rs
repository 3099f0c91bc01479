use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Evidence, SemVer, Snippet, Usage};

/// The seven pattern kinds. Doubles as the wire-level `"type"` tag and the
/// request-side type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatternKind {
    Codebase,
    Lang,
    Anti,
    Failure,
    Policy,
    Test,
    Migration,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Codebase => "CODEBASE",
            PatternKind::Lang => "LANG",
            PatternKind::Anti => "ANTI",
            PatternKind::Failure => "FAILURE",
            PatternKind::Policy => "POLICY",
            PatternKind::Test => "TEST",
            PatternKind::Migration => "MIGRATION",
        }
    }
}

impl std::str::FromStr for PatternKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CODEBASE" => Ok(PatternKind::Codebase),
            "LANG" => Ok(PatternKind::Lang),
            "ANTI" => Ok(PatternKind::Anti),
            "FAILURE" => Ok(PatternKind::Failure),
            "POLICY" => Ok(PatternKind::Policy),
            "TEST" => Ok(PatternKind::Test),
            "MIGRATION" => Ok(PatternKind::Migration),
            other => Err(format!("unknown pattern kind '{other}'")),
        }
    }
}

// Kind-specific payloads. Most kinds add no fields beyond the common
// envelope; MIGRATION is the exception. Empty structs still exist (rather
// than a bare unit variant) so new kind-specific fields have somewhere to
// land without reshaping the enum.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodebaseFields {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LangFields {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AntiFields {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureFields {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyFields {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestFields {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationFields {
    pub from_version: SemVer,
    pub to_version: SemVer,
}

/// Discriminated content body, dispatched on `kind`. Exhaustively matched at
/// every consumption site — an unknown tag is a parse-time error, not a
/// silent pass-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PatternContent {
    Codebase(CodebaseFields),
    Lang(LangFields),
    Anti(AntiFields),
    Failure(FailureFields),
    Policy(PolicyFields),
    Test(TestFields),
    Migration(MigrationFields),
}

impl PatternContent {
    pub fn kind(&self) -> PatternKind {
        match self {
            PatternContent::Codebase(_) => PatternKind::Codebase,
            PatternContent::Lang(_) => PatternKind::Lang,
            PatternContent::Anti(_) => PatternKind::Anti,
            PatternContent::Failure(_) => PatternKind::Failure,
            PatternContent::Policy(_) => PatternKind::Policy,
            PatternContent::Test(_) => PatternKind::Test,
            PatternContent::Migration(_) => PatternKind::Migration,
        }
    }
}

/// A trust-scored, typed piece of engineering knowledge — the primary
/// retrievable unit. Common envelope fields live here; kind-specific fields
/// live in `content`, mirroring the envelope/typed-content split used
/// throughout this lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub content: PatternContent,
    pub title: String,
    pub summary: String,
    pub trust_score: f64,
    pub usage: Usage,
    pub snippets: Vec<Snippet>,
    pub evidence: Vec<Evidence>,
    pub tags: BTreeSet<String>,
    pub paths: BTreeSet<String>,
    pub signature: Option<String>,
    pub deprecated: bool,
    pub version: SemVer,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Pattern {
    pub fn kind(&self) -> PatternKind {
        self.content.kind()
    }

    /// Recomputes `trust_score` from `usage`, the single source of truth.
    pub fn recompute_trust(&mut self) {
        self.trust_score = self.usage.trust_score();
    }

    /// Whether the stored `trust_score` matches the Wilson-derived value,
    /// within 1 ulp as required by the invariant.
    pub fn trust_score_matches_usage(&self) -> bool {
        let derived = self.usage.trust_score();
        ulps_eq(self.trust_score, derived)
    }
}

/// Compares two f64s for equality within 1 ulp, per the invariant's
/// "matches to within 1 ulp" wording.
fn ulps_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    let ulp = f64::EPSILON * a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= ulp
}
