use std::collections::HashSet;

/// Per-pattern boosts carried over from a prior session. Multiple signals
/// combine by taking the max, not the sum, to prevent runaway inflation
/// from a pattern appearing in several signal lists at once.
#[derive(Debug, Clone, Default)]
pub struct SignalBoosts {
    pub prior_success: HashSet<String>,
    pub related: HashSet<String>,
}

impl SignalBoosts {
    pub fn boost_for(&self, pattern_id: &str) -> f64 {
        let mut boost = 0.0f64;
        if self.prior_success.contains(pattern_id) {
            boost = boost.max(1.0);
        }
        if self.related.contains(pattern_id) {
            boost = boost.max(0.5);
        }
        boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_prior_success_gets_full_boost() {
        let signals = SignalBoosts {
            prior_success: ["PAT:A:X".to_string()].into_iter().collect(),
            related: HashSet::new(),
        };
        assert_eq!(signals.boost_for("PAT:A:X"), 1.0);
    }

    #[test]
    fn related_alone_gets_half_boost() {
        let signals = SignalBoosts {
            prior_success: HashSet::new(),
            related: ["PAT:A:X".to_string()].into_iter().collect(),
        };
        assert_eq!(signals.boost_for("PAT:A:X"), 0.5);
    }

    #[test]
    fn both_signals_take_the_max_not_the_sum() {
        let signals = SignalBoosts {
            prior_success: ["PAT:A:X".to_string()].into_iter().collect(),
            related: ["PAT:A:X".to_string()].into_iter().collect(),
        };
        assert_eq!(signals.boost_for("PAT:A:X"), 1.0);
    }

    #[test]
    fn unrelated_pattern_gets_no_boost() {
        let signals = SignalBoosts::default();
        assert_eq!(signals.boost_for("PAT:A:X"), 0.0);
    }
}
