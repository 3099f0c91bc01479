use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::errors::{ApexError, ApexResult};
use crate::model::Pattern;

use super::{apply_pragmas, run_migrations, LoadIssue, PatternStore};

/// SQLite persistence for the Pattern Lookup Core. Single write connection
/// guarded by a mutex — queries are served from the in-memory index, not
/// from SQLite, so this never sits on the hot path (see apex-retrieval's
/// concurrency model).
pub struct SqlitePatternStore {
    conn: Mutex<Connection>,
}

impl SqlitePatternStore {
    pub fn open(path: impl AsRef<Path>) -> ApexResult<Self> {
        let conn = Connection::open(path)?;
        apply_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> ApexResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn insert_row(conn: &Connection, pattern: &Pattern) -> ApexResult<()> {
        let payload = serde_json::to_string(pattern)?;
        let tags = serde_json::to_string(&pattern.tags)?;
        let paths = serde_json::to_string(&pattern.paths)?;

        conn.execute(
            "INSERT INTO patterns (id, kind, trust_score, deprecated, tags, paths, payload, created, updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                pattern.id,
                pattern.kind().as_str(),
                pattern.trust_score,
                pattern.deprecated as i32,
                tags,
                paths,
                payload,
                pattern.created.to_rfc3339(),
                pattern.updated.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn row_to_pattern(payload: String) -> ApexResult<Pattern> {
        Ok(serde_json::from_str(&payload)?)
    }
}

impl PatternStore for SqlitePatternStore {
    fn insert(&self, pattern: &Pattern) -> ApexResult<()> {
        if !pattern.trust_score_matches_usage() {
            return Err(ApexError::InvariantViolation {
                id: pattern.id.clone(),
                message: "trust_score does not match Wilson lower bound of usage".into(),
            });
        }
        let conn = self.conn.lock();
        Self::insert_row(&conn, pattern)
    }

    fn get(&self, id: &str) -> ApexResult<Option<Pattern>> {
        let conn = self.conn.lock();
        let payload: Option<String> = conn
            .query_row("SELECT payload FROM patterns WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        payload.map(Self::row_to_pattern).transpose()
    }

    fn update(&self, pattern: &Pattern) -> ApexResult<()> {
        if !pattern.trust_score_matches_usage() {
            return Err(ApexError::InvariantViolation {
                id: pattern.id.clone(),
                message: "trust_score does not match Wilson lower bound of usage".into(),
            });
        }
        let payload = serde_json::to_string(pattern)?;
        let tags = serde_json::to_string(&pattern.tags)?;
        let paths = serde_json::to_string(&pattern.paths)?;

        let conn = self.conn.lock();
        let rows = conn.execute(
            "UPDATE patterns SET kind = ?2, trust_score = ?3, deprecated = ?4, tags = ?5,
                paths = ?6, payload = ?7, updated = ?8
             WHERE id = ?1",
            params![
                pattern.id,
                pattern.kind().as_str(),
                pattern.trust_score,
                pattern.deprecated as i32,
                tags,
                paths,
                payload,
                pattern.updated.to_rfc3339(),
            ],
        )?;

        if rows == 0 {
            return Err(ApexError::NotFound { id: pattern.id.clone() });
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> ApexResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM patterns WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_all(&self) -> ApexResult<(Vec<Pattern>, Vec<LoadIssue>)> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, payload FROM patterns")?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let payload: String = row.get(1)?;
            Ok((id, payload))
        })?;

        let mut patterns = Vec::new();
        let mut issues = Vec::new();

        for row in rows {
            let (id, payload) = row?;
            match Self::row_to_pattern(payload) {
                Ok(pattern) if pattern.trust_score_matches_usage() => patterns.push(pattern),
                Ok(pattern) => {
                    warn!(id = %pattern.id, "pattern excluded: trust_score invariant violated");
                    issues.push(LoadIssue {
                        id: pattern.id.clone(),
                        message: "trust_score does not match Wilson lower bound of usage".into(),
                    });
                }
                Err(e) => {
                    warn!(%id, error = %e, "pattern excluded: payload failed to deserialize");
                    issues.push(LoadIssue { id, message: e.to_string() });
                }
            }
        }

        Ok((patterns, issues))
    }

    fn record_outcome(&self, id: &str, success: bool, at: DateTime<Utc>) -> ApexResult<()> {
        let conn = self.conn.lock();
        let payload: Option<String> = conn
            .query_row("SELECT payload FROM patterns WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;

        let mut pattern = match payload {
            Some(p) => Self::row_to_pattern(p)?,
            None => return Err(ApexError::NotFound { id: id.to_string() }),
        };

        if success {
            pattern.usage.record_success(at);
        } else {
            pattern.usage.record_failure(at);
        }
        pattern.recompute_trust();
        pattern.updated = at;

        let payload = serde_json::to_string(&pattern)?;
        conn.execute(
            "UPDATE patterns SET trust_score = ?2, payload = ?3, updated = ?4 WHERE id = ?1",
            params![pattern.id, pattern.trust_score, payload, pattern.updated.to_rfc3339()],
        )?;
        conn.execute(
            "INSERT INTO pattern_usage_history (pattern_id, success, recorded_at) VALUES (?1, ?2, ?3)",
            params![id, success as i32, at.to_rfc3339()],
        )?;
        Ok(())
    }
}
