use std::collections::{BTreeSet, HashMap};

use super::tokenize_path;

#[derive(Default)]
struct Node {
    children: HashMap<String, Node>,
    is_glob: bool,
    double_glob: bool,
    pattern_ids: BTreeSet<String>,
}

/// Glob-aware candidate generator keyed on tokenized file paths. Patterns
/// attach at the node for their declared glob; a concrete path matches a
/// pattern if it falls under that glob's prefix or wildcard, per spec
/// §4.C's priority-ordered search rules.
#[derive(Default)]
pub struct PathTrie {
    root: Node,
}

/// Standalone predicate: does a single glob match a single concrete path?
/// Used by the scoring engine's path_score, independent of any trie
/// structure, but built from the same tokenization and segment-matching
/// rules as `PathTrie`.
pub fn glob_matches(glob: &str, path: &str) -> bool {
    let glob_tokens = tokenize_path(glob);
    let path_tokens = tokenize_path(path);
    glob_match_tokens(&glob_tokens, 0, &path_tokens, 0)
}

fn glob_match_tokens(glob: &[String], gi: usize, path: &[String], pi: usize) -> bool {
    if gi == glob.len() {
        // Prefix semantics: a glob applies to its declared directory and
        // everything below it, matching PathTrie's rule 1.
        return true;
    }
    let token = &glob[gi];
    if token == "**" {
        if gi == glob.len() - 1 {
            return true; // trailing ** matches everything remaining, including nothing
        }
        for advance in pi..=path.len() {
            if glob_match_tokens(glob, gi + 1, path, advance) {
                return true;
            }
        }
        return false;
    }
    if pi >= path.len() {
        return false;
    }
    let is_wild = token.contains('*') || token.contains('?');
    let matches = if is_wild {
        glob_segment_matches(token, &path[pi])
    } else {
        token == &path[pi]
    };
    matches && glob_match_tokens(glob, gi + 1, path, pi + 1)
}

impl PathTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `pattern_id` at the terminal node for `glob`.
    pub fn insert(&mut self, glob: &str, pattern_id: &str) {
        let tokens = tokenize_path(glob);
        let mut node = &mut self.root;
        for token in &tokens {
            let is_double = token == "**";
            let is_single_glob = token.contains('*') || token.contains('?');
            node = node.children.entry(token.clone()).or_default();
            node.is_glob = is_single_glob && !is_double;
            node.double_glob = is_double;
        }
        node.pattern_ids.insert(pattern_id.to_string());
    }

    /// All pattern ids whose declared globs match `path`.
    pub fn find_candidates(&self, path: &str) -> BTreeSet<String> {
        let tokens = tokenize_path(path);
        let mut out = BTreeSet::new();
        search(&self.root, &tokens, 0, &mut out);
        out
    }
}

fn search(node: &Node, tokens: &[String], idx: usize, out: &mut BTreeSet<String>) {
    // Rule 1: every pattern at the current node applies — a pattern
    // declared for a directory applies to that directory and everything
    // below it.
    out.extend(node.pattern_ids.iter().cloned());

    if idx >= tokens.len() {
        // Still allow double-glob children to match zero remaining segments.
        for (seg, child) in &node.children {
            if seg == "**" {
                search(child, tokens, idx, out);
            }
        }
        return;
    }

    let current = &tokens[idx];

    for (seg, child) in &node.children {
        if child.double_glob {
            // Rule 4: ** matches any number of directories, including zero.
            for advance in idx..=tokens.len() {
                search(child, tokens, advance, out);
            }
        } else if seg == current {
            // Rule 2: exact match.
            search(child, tokens, idx + 1, out);
        } else if child.is_glob && glob_segment_matches(seg, current) {
            // Rule 3: single-segment glob (`*`, `?`).
            search(child, tokens, idx + 1, out);
        }
    }
}

/// Translate a glob segment to a regex the way spec §4.C specifies:
/// `*` -> `.*`, `?` -> `.`, literal `.` escaped.
fn glob_segment_matches(glob: &str, segment: &str) -> bool {
    let mut pattern = String::from("^");
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '.' => pattern.push_str("\\."),
            other => {
                if regex_special(other) {
                    pattern.push('\\');
                }
                pattern.push(other);
            }
        }
    }
    pattern.push('$');

    regex::Regex::new(&pattern)
        .map(|re| re.is_match(segment))
        .unwrap_or(false)
}

fn regex_special(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '+' | '^' | '$' | '|' | '\\')
}
