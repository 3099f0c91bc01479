use serde::{Deserialize, Serialize};

/// A citation or source backing a pattern, most load-bearing for ANTI and
/// FAILURE kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub kind: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
