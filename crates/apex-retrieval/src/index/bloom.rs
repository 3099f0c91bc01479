use super::tokenize_path;

/// Space-efficient set over path tokens, used as a conservative
/// "definitely-no-match" reject before the trie is consulted. False
/// positives are acceptable; false negatives are not.
///
/// Immutable after construction — mutation requires a rebuild, which the
/// orchestrator performs under its writer lock (see apex-retrieval's
/// concurrency model).
#[derive(Debug, Clone)]
pub struct BloomPrefilter {
    bits: Vec<bool>,
    seeds: Vec<u64>,
    /// Set when at least one indexed glob has no literal (non-wildcard)
    /// token at all (e.g. a bare `**`). Such a glob can match a path
    /// sharing zero tokens with anything we indexed, so the filter can't
    /// safely reject anything and `might_match` always returns `true`.
    always_match: bool,
}

impl BloomPrefilter {
    /// Build from the union of every indexed pattern's *literal* path
    /// tokens (wildcard segments like `*`/`**` excluded by the caller),
    /// sized for the token count at `target_fp_rate`. `always_match`
    /// disables rejection entirely, for an index containing a fully
    /// wildcarded glob.
    pub fn build<'a>(tokens: impl Iterator<Item = &'a str>, target_fp_rate: f64, always_match: bool) -> Self {
        let token_set: std::collections::HashSet<&str> = tokens.collect();
        let n = token_set.len().max(1);

        let m = bit_count(n, target_fp_rate);
        let k = hash_count(m, n);

        let mut filter = Self {
            bits: vec![false; m],
            seeds: (0..k).map(|i| seed_for(i as u64)).collect(),
            always_match,
        };

        for token in token_set {
            filter.insert(token);
        }

        filter
    }

    fn insert(&mut self, token: &str) {
        let m = self.bits.len() as u64;
        for &seed in &self.seeds {
            let idx = (djb2_seeded(token, seed) % m) as usize;
            self.bits[idx] = true;
        }
    }

    /// `false` means the path cannot match any indexed pattern — the trie
    /// is skipped entirely. `true` may still be a false positive.
    ///
    /// A matching concrete path is only guaranteed to share *some* token
    /// with the glob it matches (wildcard segments contribute none), so
    /// this checks for any overlap rather than requiring every query
    /// token to be present — the latter would false-negative on any path
    /// whose wildcard-matched segments were never indexed.
    pub fn might_match(&self, path: &str) -> bool {
        if self.always_match {
            return true;
        }
        let tokens = tokenize_path(path);
        if tokens.is_empty() {
            return true;
        }
        tokens.iter().any(|t| self.token_present(t))
    }

    fn token_present(&self, token: &str) -> bool {
        let m = self.bits.len() as u64;
        self.seeds
            .iter()
            .all(|&seed| self.bits[(djb2_seeded(token, seed) % m) as usize])
    }
}

fn bit_count(n: usize, p: f64) -> usize {
    let n = n as f64;
    (-(n * p.ln()) / (std::f64::consts::LN_2.powi(2))).ceil() as usize
}

fn hash_count(m: usize, n: usize) -> usize {
    (((m as f64) / (n as f64)) * std::f64::consts::LN_2).ceil().max(1.0) as usize
}

/// A distinct odd multiplier per seed index, combined with djb2 so that
/// any two seeds produce statistically independent bit indices.
fn seed_for(i: u64) -> u64 {
    0x9E3779B97F4A7C15u64.wrapping_mul(i.wrapping_add(1))
}

/// djb2-style non-cryptographic string hash, perturbed by `seed`.
fn djb2_seeded(s: &str, seed: u64) -> u64 {
    let mut hash: u64 = 5381 ^ seed;
    for byte in s.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u64);
    }
    hash ^ seed.wrapping_mul(0x2545F4914F6CDD1D)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_produces_false_negatives() {
        let paths = ["src/ui/button.tsx", "docs/readme.md", "lib/a/b/c.rs"];
        let tokens: Vec<String> = paths.iter().flat_map(|p| tokenize_path(p)).collect();
        let filter = BloomPrefilter::build(tokens.iter().map(|s| s.as_str()), 0.1, false);
        for path in paths {
            assert!(filter.might_match(path), "false negative for {path}");
        }
    }

    #[test]
    fn glob_literal_prefix_tokens_admit_a_wildcard_matched_path() {
        // "src/ui/**" indexes only its literal tokens {src, ui}; a concrete
        // path matched through the "**" segment shares those but adds
        // tokens ("button", ".tsx") never seen at index time.
        let tokens = vec!["src".to_string(), "ui".to_string()];
        let filter = BloomPrefilter::build(tokens.iter().map(|s| s.as_str()), 0.1, false);
        assert!(filter.might_match("src/ui/Button.tsx"));
    }

    #[test]
    fn rejects_paths_with_unseen_tokens() {
        let tokens = vec!["src".to_string(), "ui".to_string(), "button".to_string()];
        let filter = BloomPrefilter::build(tokens.iter().map(|s| s.as_str()), 0.1, false);
        assert!(!filter.might_match("completely/unrelated/zzz9999.xyz"));
    }

    #[test]
    fn empty_path_always_might_match() {
        let filter = BloomPrefilter::build(std::iter::empty(), 0.1, false);
        assert!(filter.might_match(""));
    }

    #[test]
    fn always_match_bypasses_rejection() {
        let filter = BloomPrefilter::build(std::iter::empty(), 0.1, true);
        assert!(filter.might_match("completely/unrelated/zzz9999.xyz"));
    }
}
