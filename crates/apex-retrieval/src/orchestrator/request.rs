use std::collections::BTreeSet;

use apex_core::model::PatternKind;
use serde::{Deserialize, Serialize};

use super::SignalSet;

/// Wire-level lookup request (spec §6). Field names are bytes-exact at the
/// boundary; `rename_all` keeps the Rust side snake_case while matching the
/// documented JSON shape (already snake_case here, so this is a no-op that
/// documents the contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub task: String,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(rename = "type", default)]
    pub type_filter: Option<PatternKind>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub min_trust: Option<f64>,
    #[serde(default)]
    pub signals: SignalSet,
    #[serde(default)]
    pub exclude: BTreeSet<String>,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub partial_ok: bool,
    pub deadline_ms: Option<u64>,
}

fn default_k() -> usize {
    10
}

impl LookupRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            paths: Vec::new(),
            type_filter: None,
            tags: BTreeSet::new(),
            min_trust: None,
            signals: SignalSet::default(),
            exclude: BTreeSet::new(),
            k: default_k(),
            partial_ok: false,
            deadline_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalSet {
    #[serde(default)]
    pub prior_success: BTreeSet<String>,
    #[serde(default)]
    pub related: BTreeSet<String>,
}

impl SignalSet {
    pub fn is_empty(&self) -> bool {
        self.prior_success.is_empty() && self.related.is_empty()
    }
}
