use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Success/failure tally backing a pattern's trust score, plus the last
/// time the pattern was surfaced in a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub successes: u64,
    pub failures: u64,
    pub last_used: Option<DateTime<Utc>>,
}

impl Default for Usage {
    fn default() -> Self {
        Self {
            successes: 0,
            failures: 0,
            last_used: None,
        }
    }
}

impl Usage {
    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.successes += 1;
        self.last_used = Some(at);
    }

    pub fn record_failure(&mut self, at: DateTime<Utc>) {
        self.failures += 1;
        self.last_used = Some(at);
    }

    pub fn trust_score(&self) -> f64 {
        super::trust::wilson_lower_bound(self.successes, self.failures)
    }
}
