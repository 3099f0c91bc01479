mod evidence;
mod pattern;
mod resource;
mod semver;
mod snippet;
mod trust;
mod usage;

pub use evidence::Evidence;
pub use pattern::{
    AntiFields, CodebaseFields, FailureFields, LangFields, MigrationFields, Pattern,
    PatternContent, PatternKind, PolicyFields, TestFields,
};
pub use resource::{Resource, ResourceContent, ResourceKind};
pub use semver::SemVer;
pub use snippet::{Snippet, LANGUAGE_ALLOWLIST};
pub use trust::{stars_to_trust_score, trust_score_to_stars, wilson_lower_bound, Z_95};
pub use usage::Usage;
