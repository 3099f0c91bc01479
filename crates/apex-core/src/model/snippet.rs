use serde::{Deserialize, Serialize};

/// Languages accepted in a pattern's `snippets`. Kept small and explicit —
/// unknown languages are a structural validation error, not a silent pass.
pub const LANGUAGE_ALLOWLIST: &[&str] = &[
    "rust",
    "typescript",
    "javascript",
    "python",
    "go",
    "java",
    "kotlin",
    "c",
    "cpp",
    "bash",
    "sql",
    "yaml",
    "json",
    "toml",
    "text",
];

/// A single code example attached to a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub language: String,
    pub code: String,
}

impl Snippet {
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}
