//! v001: patterns table + usage history append log.

use rusqlite::Connection;

use crate::errors::ApexResult;

pub fn migrate(conn: &Connection) -> ApexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS patterns (
            id           TEXT PRIMARY KEY,
            kind         TEXT NOT NULL,
            trust_score  REAL NOT NULL,
            deprecated   INTEGER NOT NULL DEFAULT 0,
            tags         TEXT NOT NULL DEFAULT '[]',
            paths        TEXT NOT NULL DEFAULT '[]',
            payload      TEXT NOT NULL,
            created      TEXT NOT NULL,
            updated      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_patterns_kind ON patterns(kind);
        CREATE INDEX IF NOT EXISTS idx_patterns_trust ON patterns(trust_score);

        CREATE TABLE IF NOT EXISTS pattern_usage_history (
            event_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            pattern_id  TEXT NOT NULL,
            success     INTEGER NOT NULL,
            recorded_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_usage_history_pattern
            ON pattern_usage_history(pattern_id, recorded_at);
        ",
    )?;
    Ok(())
}
