use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource kind, mirroring `Pattern`'s tag-then-payload split. The core
/// only needs to serialize these (the tool surface that mutates them is out
/// of scope); see spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResourceContent {
    File { path: String },
    Pattern { pattern_id: String },
    Brief { text: String },
}

impl ResourceContent {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceContent::File { .. } => ResourceKind::File,
            ResourceContent::Pattern { .. } => ResourceKind::Pattern,
            ResourceContent::Brief { .. } => ResourceKind::Brief,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    File,
    Pattern,
    Brief,
}

/// A session-scoped resource, unique by `id` within its registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    pub content: ResourceContent,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.content.kind()
    }

    /// Typed accessor: returns the file path, or `InvalidResourceTypeError`
    /// semantics encoded as `None` for the caller to map.
    pub fn as_file_path(&self) -> Option<&str> {
        match &self.content {
            ResourceContent::File { path } => Some(path),
            _ => None,
        }
    }
}
