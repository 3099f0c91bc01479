use serde::{Deserialize, Serialize};

/// Scoring weights and retrieval parameters. Kept as configuration rather
/// than hardcoded — the spec's ranking weights are not derived from data
/// (open question in spec §9), so an operator calibrating against a
/// labeled set has somewhere to put the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub weight_path: f64,
    pub weight_text: f64,
    pub weight_signal: f64,
    pub weight_trust: f64,

    pub bloom_target_fp_rate: f64,

    pub default_k: usize,
    pub max_k: usize,
    pub max_candidate_paths: usize,
    pub max_task_bytes: usize,

    pub deprecated_score_multiplier: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            weight_path: 0.35,
            weight_text: 0.25,
            weight_signal: 0.20,
            weight_trust: 0.20,
            bloom_target_fp_rate: 0.1,
            default_k: 10,
            max_k: 100,
            max_candidate_paths: 32,
            max_task_bytes: 8 * 1024,
            deprecated_score_multiplier: 0.25,
        }
    }
}

impl RetrievalConfig {
    /// The four scoring weights must sum to 1 within 1e-6.
    pub fn weights_are_valid(&self) -> bool {
        let sum = self.weight_path + self.weight_text + self.weight_signal + self.weight_trust;
        (sum - 1.0).abs() < 1e-6
    }
}
