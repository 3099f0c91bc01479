mod bloom;
mod heap;
mod scalar;
mod trie;

pub use bloom::BloomPrefilter;
pub use heap::{BoundedHeap, Scored};
pub use scalar::ScalarIndex;
pub use trie::{glob_matches, PathTrie};

/// Tokenize a path identically for the bloom prefilter and the trie:
/// normalize to forward slashes, lowercase, split on `/`, and split a
/// trailing `.ext` off each filename segment as its own token.
///
/// `src/FOO.test.ts` -> `["src", "foo", ".test", ".ts"]`
pub fn tokenize_path(path: &str) -> Vec<String> {
    let normalized = path.replace('\\', "/").to_lowercase();
    let mut tokens = Vec::new();

    for segment in normalized.split('/') {
        if segment.is_empty() {
            continue;
        }
        let mut parts = segment.split('.');
        let stem = parts.next().unwrap_or_default();
        if !stem.is_empty() {
            tokens.push(stem.to_string());
        }
        for ext in parts {
            if !ext.is_empty() {
                tokens.push(format!(".{ext}"));
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trailing_extensions() {
        assert_eq!(
            tokenize_path("src/FOO.test.ts"),
            vec!["src", "foo", ".test", ".ts"]
        );
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(tokenize_path("//src//ui/"), vec!["src", "ui"]);
    }
}
