mod migrations;
mod pragmas;
mod sqlite;

pub use migrations::{current_version, run_migrations, LATEST_VERSION};
pub use pragmas::apply_pragmas;
pub use sqlite::SqlitePatternStore;

use chrono::{DateTime, Utc};

use crate::errors::ApexResult;
use crate::model::Pattern;

/// A pattern that failed the load-time invariant check (on-disk
/// `trust_score` did not match the Wilson-derived value). Non-fatal for the
/// store as a whole — the pattern is excluded and the caller is expected to
/// count it in metrics.
#[derive(Debug, Clone)]
pub struct LoadIssue {
    pub id: String,
    pub message: String,
}

/// Persistence boundary for patterns, analogous to `IMemoryStorage` in the
/// parent lineage. The retrieval index is built from `list_all`'s output;
/// queries never touch SQLite directly.
pub trait PatternStore: Send + Sync {
    fn insert(&self, pattern: &Pattern) -> ApexResult<()>;
    fn get(&self, id: &str) -> ApexResult<Option<Pattern>>;
    fn update(&self, pattern: &Pattern) -> ApexResult<()>;
    fn delete(&self, id: &str) -> ApexResult<()>;

    /// Load every pattern, excluding any whose on-disk `trust_score`
    /// contradicts its derivation (see spec §3's load-time invariant).
    fn list_all(&self) -> ApexResult<(Vec<Pattern>, Vec<LoadIssue>)>;

    fn record_outcome(&self, id: &str, success: bool, at: DateTime<Utc>) -> ApexResult<()>;
}
