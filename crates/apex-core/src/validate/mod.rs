mod semantic;
mod structural;

pub use semantic::{validate_semantic, SemanticWarning};
pub use structural::validate_structural;

use serde_json::Value;

use crate::errors::SchemaError;
use crate::model::Pattern;

/// Document surface syntax, extension-dispatched per spec §6. Unrecognized
/// extensions are rejected with a `SchemaError` before parsing is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl DocFormat {
    pub fn from_extension(ext: &str) -> Result<Self, SchemaError> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "json" => Ok(DocFormat::Json),
            "yaml" | "yml" => Ok(DocFormat::Yaml),
            other => Err(SchemaError::single(
                "$",
                format!("unrecognized pattern file extension '{other}'"),
            )),
        }
    }
}

/// Parse raw bytes of either surface syntax into a unified JSON value tree.
pub fn parse_document(raw: &str, format: DocFormat) -> Result<Value, SchemaError> {
    match format {
        DocFormat::Json => serde_json::from_str(raw)
            .map_err(|e| SchemaError::single("$", format!("invalid JSON: {e}"))),
        DocFormat::Yaml => {
            let yaml_value: serde_yaml::Value = serde_yaml::from_str(raw)
                .map_err(|e| SchemaError::single("$", format!("invalid YAML: {e}")))?;
            serde_json::to_value(yaml_value)
                .map_err(|e| SchemaError::single("$", format!("could not normalize YAML: {e}")))
        }
    }
}

/// Full two-phase validation: structural (blocking, collected) then semantic
/// (non-blocking warnings). Never partial-succeeds — a structural failure
/// returns before semantic checks run.
pub fn validate_document(raw: &str, format: DocFormat) -> Result<(Pattern, Vec<SemanticWarning>), SchemaError> {
    let doc = parse_document(raw, format)?;
    let pattern = validate_structural(&doc)?;
    let warnings = validate_semantic(&pattern);
    Ok((pattern, warnings))
}
