use apex_core::model::{PatternKind, Snippet};
use serde::Serialize;

/// A single scored pattern on the wire (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct RankedPattern {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub title: String,
    pub summary: String,
    pub trust_score: f64,
    pub snippets: Vec<Snippet>,
    pub score: f64,
}

impl crate::index::Scored for RankedPattern {
    fn score(&self) -> f64 {
        self.score
    }
    fn id(&self) -> &str {
        &self.id
    }
}

/// Wire-level lookup response (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    pub patterns: Vec<RankedPattern>,
    pub latency_ms: f64,
    pub truncated: bool,
}
