use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::errors::{SchemaError, SchemaIssue};
use crate::model::{
    AntiFields, CodebaseFields, Evidence, FailureFields, LangFields, MigrationFields, Pattern,
    PatternContent, PatternKind, PolicyFields, SemVer, Snippet, TestFields, Usage,
    LANGUAGE_ALLOWLIST,
};

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^PAT:[A-Z][A-Z0-9_]*:[A-Z0-9_]+$").unwrap())
}

/// Collects issues into `issues` rather than short-circuiting, so callers
/// see every problem in one pass.
struct Collector<'a> {
    issues: &'a mut Vec<SchemaIssue>,
}

impl<'a> Collector<'a> {
    fn err(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(SchemaIssue::new(path, message));
    }

    fn get_str(&mut self, obj: &serde_json::Map<String, Value>, path: &str, field: &str) -> Option<String> {
        match obj.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.err(format!("{path}.{field}"), format!("expected string for '{field}'"));
                None
            }
            None => {
                self.err(format!("{path}.{field}"), format!("missing required field '{field}'"));
                None
            }
        }
    }

    fn get_str_opt(&mut self, obj: &serde_json::Map<String, Value>, path: &str, field: &str) -> Option<String> {
        match obj.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                self.err(format!("{path}.{field}"), format!("expected string for '{field}'"));
                None
            }
        }
    }

    fn get_bool(&mut self, obj: &serde_json::Map<String, Value>, path: &str, field: &str, default: bool) -> bool {
        match obj.get(field) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Null) | None => default,
            Some(_) => {
                self.err(format!("{path}.{field}"), format!("expected bool for '{field}'"));
                default
            }
        }
    }

    fn get_u64(&mut self, obj: &serde_json::Map<String, Value>, path: &str, field: &str, default: u64) -> u64 {
        match obj.get(field) {
            Some(v) if v.is_u64() => v.as_u64().unwrap(),
            Some(Value::Null) | None => default,
            Some(_) => {
                self.err(format!("{path}.{field}"), format!("expected non-negative integer for '{field}'"));
                default
            }
        }
    }

    fn get_f64(&mut self, obj: &serde_json::Map<String, Value>, path: &str, field: &str, default: f64) -> f64 {
        match obj.get(field) {
            Some(v) if v.is_number() => v.as_f64().unwrap_or(default),
            Some(Value::Null) | None => default,
            Some(_) => {
                self.err(format!("{path}.{field}"), format!("expected number for '{field}'"));
                default
            }
        }
    }

    fn get_str_array(&mut self, obj: &serde_json::Map<String, Value>, path: &str, field: &str) -> BTreeSet<String> {
        match obj.get(field) {
            Some(Value::Array(items)) => {
                let mut set = BTreeSet::new();
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => {
                            set.insert(s.clone());
                        }
                        _ => self.err(format!("{path}.{field}[{i}]"), "expected string"),
                    }
                }
                set
            }
            Some(Value::Null) | None => BTreeSet::new(),
            Some(_) => {
                self.err(format!("{path}.{field}"), format!("expected array for '{field}'"));
                BTreeSet::new()
            }
        }
    }

    fn get_timestamp(&mut self, obj: &serde_json::Map<String, Value>, path: &str, field: &str) -> Option<DateTime<Utc>> {
        match obj.get(field) {
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    self.err(format!("{path}.{field}"), format!("invalid RFC3339 timestamp: {e}"));
                    None
                }
            },
            Some(Value::Null) | None => None,
            Some(_) => {
                self.err(format!("{path}.{field}"), format!("expected RFC3339 string for '{field}'"));
                None
            }
        }
    }
}

/// Phase 1: structural validation. Checks the discriminated variant,
/// required fields per kind, types, ranges, and the id-format regex.
/// Fails with every issue collected together; never partial-success.
pub fn validate_structural(doc: &Value) -> Result<Pattern, SchemaError> {
    let mut issues = Vec::new();
    let pattern = validate_structural_inner(doc, &mut issues);

    if !issues.is_empty() {
        return Err(SchemaError::new(issues));
    }

    Ok(pattern.expect("no issues implies a pattern was built"))
}

fn validate_structural_inner(doc: &Value, issues: &mut Vec<SchemaIssue>) -> Option<Pattern> {
    let mut c = Collector { issues };

    let obj = match doc.as_object() {
        Some(o) => o,
        None => {
            c.err("$", "document root must be an object");
            return None;
        }
    };

    let id = c.get_str(obj, "$", "id");
    if let Some(ref id) = id {
        if !id_regex().is_match(id) {
            c.err("$.id", format!("id '{id}' does not match ^PAT:[A-Z][A-Z0-9_]*:[A-Z0-9_]+$"));
        }
    }

    let type_str = c.get_str(obj, "$", "type");
    let kind = type_str.as_deref().and_then(|t| match PatternKind::from_str(t) {
        Ok(k) => Some(k),
        Err(e) => {
            c.err("$.type", e);
            None
        }
    });

    let title = c.get_str(obj, "$", "title").unwrap_or_default();
    let summary = c.get_str(obj, "$", "summary").unwrap_or_default();

    let trust_score = c.get_f64(obj, "$", "trust_score", 0.0);
    if !(0.0..=1.0).contains(&trust_score) {
        c.err("$.trust_score", "trust_score must be in [0, 1]");
    }

    let usage = match obj.get("usage") {
        Some(Value::Object(u)) => {
            let successes = c.get_u64(u, "$.usage", "successes", 0);
            let failures = c.get_u64(u, "$.usage", "failures", 0);
            let last_used = c.get_timestamp(u, "$.usage", "last_used");
            Usage { successes, failures, last_used }
        }
        Some(Value::Null) | None => Usage::default(),
        Some(_) => {
            c.err("$.usage", "expected object for 'usage'");
            Usage::default()
        }
    };

    let snippets = match obj.get("snippets") {
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let path = format!("$.snippets[{i}]");
                match item.as_object() {
                    Some(s) => {
                        let language = c.get_str(s, &path, "language").unwrap_or_default();
                        let code = c.get_str(s, &path, "code").unwrap_or_default();
                        if code.trim().is_empty() {
                            c.err(format!("{path}.code"), "snippet code must be non-empty");
                        }
                        if !LANGUAGE_ALLOWLIST.contains(&language.as_str()) {
                            c.err(
                                format!("{path}.language"),
                                format!("language '{language}' is not in the allowlist"),
                            );
                        }
                        out.push(Snippet { language, code });
                    }
                    None => c.err(path, "expected object"),
                }
            }
            out
        }
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            c.err("$.snippets", "expected array for 'snippets'");
            Vec::new()
        }
    };

    let evidence = match obj.get("evidence") {
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let path = format!("$.evidence[{i}]");
                match item.as_object() {
                    Some(e) => {
                        let kind = c.get_str(e, &path, "kind").unwrap_or_default();
                        let reference = c.get_str(e, &path, "ref").unwrap_or_default();
                        let note = c.get_str_opt(e, &path, "note");
                        out.push(Evidence { kind, reference, note });
                    }
                    None => c.err(path, "expected object"),
                }
            }
            out
        }
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            c.err("$.evidence", "expected array for 'evidence'");
            Vec::new()
        }
    };

    let tags = c.get_str_array(obj, "$", "tags");
    let paths = c.get_str_array(obj, "$", "paths");
    let signature = c.get_str_opt(obj, "$", "signature");
    let deprecated = c.get_bool(obj, "$", "deprecated", false);

    let version = match obj.get("version") {
        Some(Value::String(s)) => SemVer::from_str(s).unwrap_or_else(|e| {
            c.err("$.version", e);
            SemVer::default()
        }),
        Some(Value::Array(parts)) if parts.len() == 3 => {
            let nums: Option<Vec<u32>> = parts.iter().map(|v| v.as_u64().map(|n| n as u32)).collect();
            match nums {
                Some(n) => SemVer::new(n[0], n[1], n[2]),
                None => {
                    c.err("$.version", "version array must contain three integers");
                    SemVer::default()
                }
            }
        }
        Some(Value::Null) | None => SemVer::default(),
        Some(_) => {
            c.err("$.version", "expected a 'major.minor.patch' string or 3-integer array");
            SemVer::default()
        }
    };

    let created = c.get_timestamp(obj, "$", "created").unwrap_or_else(Utc::now);
    let updated = c.get_timestamp(obj, "$", "updated").unwrap_or_else(Utc::now);

    // Kind-specific required fields.
    let content = match kind {
        Some(PatternKind::Codebase) => {
            if paths.is_empty() {
                c.err("$.paths", "CODEBASE patterns must declare at least one path");
            }
            Some(PatternContent::Codebase(CodebaseFields {}))
        }
        Some(PatternKind::Lang) => Some(PatternContent::Lang(LangFields {})),
        Some(PatternKind::Anti) => Some(PatternContent::Anti(AntiFields {})),
        Some(PatternKind::Failure) => {
            if signature.is_none() && evidence.is_empty() {
                c.err(
                    "$",
                    "FAILURE patterns must carry a signature or at least one evidence entry",
                );
            }
            Some(PatternContent::Failure(FailureFields {}))
        }
        Some(PatternKind::Policy) => Some(PatternContent::Policy(PolicyFields {})),
        Some(PatternKind::Test) => Some(PatternContent::Test(TestFields {})),
        Some(PatternKind::Migration) => {
            let obj_migration = obj.get("migration").and_then(Value::as_object);
            match obj_migration {
                Some(m) => {
                    let from_version = c
                        .get_str(m, "$.migration", "from_version")
                        .and_then(|s| SemVer::from_str(&s).ok());
                    let to_version = c
                        .get_str(m, "$.migration", "to_version")
                        .and_then(|s| SemVer::from_str(&s).ok());
                    match (from_version, to_version) {
                        (Some(from_version), Some(to_version)) => {
                            Some(PatternContent::Migration(MigrationFields { from_version, to_version }))
                        }
                        _ => None,
                    }
                }
                None => {
                    c.err(
                        "$.migration",
                        "MIGRATION patterns must carry a 'migration' object with from_version/to_version",
                    );
                    None
                }
            }
        }
        None => None,
    };

    let id = id?;
    let content = content?;

    Some(Pattern {
        id,
        content,
        title,
        summary,
        trust_score,
        usage,
        snippets,
        evidence,
        tags,
        paths,
        signature,
        deprecated,
        version,
        created,
        updated,
    })
}
