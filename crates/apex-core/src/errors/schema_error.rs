use serde::{Deserialize, Serialize};

/// A single structural validation problem at a specific path within a
/// pattern document. Collected, never short-circuited — callers see every
/// problem at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    pub path: String,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Structural validation failed. Carries every issue found, not just the
/// first — validation never partial-succeeds.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[error("schema validation failed with {} issue(s)", issues.len())]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaError {
    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        Self { issues }
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![SchemaIssue::new(path, message)],
        }
    }
}
