use std::collections::HashSet;

/// Small, fixed stop-word list — this core is not competing with a
/// general search engine (spec non-goals), so a short list is enough to
/// keep Jaccard overlap meaningful.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "for", "with", "is", "are",
    "was", "were", "be", "been", "being", "this", "that", "it", "as", "at", "by", "from", "we",
    "i", "you", "they",
];

/// Lower-case, split on non-alphanumerics, drop stop-words and empties.
pub fn tokenize_task(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Jaccard similarity between two token sets, clamped to [0, 1]. Empty-vs-
/// empty is defined as 0 (no overlap to claim).
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    (intersection / union).clamp(0.0, 1.0)
}
