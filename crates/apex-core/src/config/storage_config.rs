use serde::{Deserialize, Serialize};

/// Environment variable that overrides the backing store path. Absent ->
/// the default path derived from a project identifier (spec §6).
pub const STORE_PATH_ENV_VAR: &str = "APEX_STORE_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Default path, used when `APEX_STORE_PATH` is unset.
    pub default_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_path: "apex.db".to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolve the effective store path: environment override first, then
    /// `default_path`. No other environment coupling.
    pub fn resolve_path(&self) -> String {
        std::env::var(STORE_PATH_ENV_VAR).unwrap_or_else(|_| self.default_path.clone())
    }
}
