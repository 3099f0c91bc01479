use super::SchemaError;

/// Top-level error type for the Pattern Lookup Core.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum ApexError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("invariant violation for pattern {id}: {message}")]
    InvariantViolation { id: String, message: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("pattern not found: {id}")]
    NotFound { id: String },

    #[error("lookup timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("query cancelled")]
    Cancelled,

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid resource type: expected {expected}, found {found}")]
    InvalidResourceType { expected: String, found: String },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias, mirroring `CortexResult`.
pub type ApexResult<T> = Result<T, ApexError>;

/// Stable, lowercase-snake error-kind tag used as a metrics key.
/// Kept independent of the `Display` message so dashboards don't break when
/// wording changes.
impl ApexError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApexError::Schema(_) => "schema_error",
            ApexError::InvariantViolation { .. } => "invariant_violation",
            ApexError::BadRequest(_) => "bad_request",
            ApexError::NotFound { .. } => "not_found",
            ApexError::Timeout { .. } => "timeout",
            ApexError::Cancelled => "cancelled",
            ApexError::Store(_) => "store_error",
            ApexError::InvalidResourceType { .. } => "invalid_resource_type",
            ApexError::Sqlite(_) => "store_error",
            ApexError::Serialization(_) => "store_error",
        }
    }
}
