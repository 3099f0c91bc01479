//! End-to-end document validation: extension dispatch, structural error
//! collection, and the FAILURE-without-evidence structural rule.

use apex_core::errors::SchemaError;
use apex_core::validate::{validate_document, DocFormat};

const VALID_CODEBASE_JSON: &str = r#"{
    "id": "PAT:UI:BUTTON",
    "type": "CODEBASE",
    "title": "Button pattern",
    "summary": "How we build buttons",
    "paths": ["src/ui/**"],
    "usage": { "successes": 4, "failures": 1 }
}"#;

#[test]
fn json_extension_parses_a_valid_codebase_pattern() {
    let (pattern, warnings) = validate_document(VALID_CODEBASE_JSON, DocFormat::Json).unwrap();
    assert_eq!(pattern.id, "PAT:UI:BUTTON");
    assert!(warnings.is_empty());
}

#[test]
fn yaml_extension_parses_the_same_shape() {
    let yaml = r#"
id: "PAT:UI:BUTTON"
type: "CODEBASE"
title: "Button pattern"
summary: "How we build buttons"
paths:
  - "src/ui/**"
usage:
  successes: 4
  failures: 1
"#;
    let (pattern, _) = validate_document(yaml, DocFormat::Yaml).unwrap();
    assert_eq!(pattern.id, "PAT:UI:BUTTON");
}

#[test]
fn unrecognized_extension_is_rejected_before_parsing() {
    let err = DocFormat::from_extension("txt").unwrap_err();
    assert!(matches!(err, SchemaError { .. }));
}

#[test]
fn structural_errors_are_collected_not_short_circuited() {
    let broken = r#"{
        "id": "not-a-valid-id",
        "type": "NOT_A_KIND",
        "trust_score": 5.0
    }"#;
    let err = validate_document(broken, DocFormat::Json).unwrap_err();
    // id format, unknown type, and out-of-range trust_score should all surface together.
    assert!(err.issues.len() >= 3, "expected multiple collected issues, got {:?}", err.issues);
}

#[test]
fn failure_pattern_without_signature_or_evidence_is_a_structural_error() {
    let doc = r#"{
        "id": "PAT:FAIL:NPE",
        "type": "FAILURE",
        "title": "Null pointer on empty input",
        "summary": "Crashes when the list is empty"
    }"#;
    let result = validate_document(doc, DocFormat::Json);
    assert!(result.is_err());
}

#[test]
fn failure_pattern_with_evidence_passes_structural_validation() {
    let doc = r#"{
        "id": "PAT:FAIL:NPE",
        "type": "FAILURE",
        "title": "Null pointer on empty input",
        "summary": "Crashes when the list is empty",
        "evidence": [{ "kind": "incident", "ref": "INC-1423" }]
    }"#;
    let (pattern, _) = validate_document(doc, DocFormat::Json).unwrap();
    assert_eq!(pattern.id, "PAT:FAIL:NPE");
}
