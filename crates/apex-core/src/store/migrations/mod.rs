//! Migration runner — version tracking, forward-only, one migration per
//! schema change.

mod v001_patterns_schema;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::errors::ApexResult;

/// Total number of migrations.
pub const LATEST_VERSION: u32 = 1;

type MigrationFn = fn(&Connection) -> ApexResult<()>;

const MIGRATIONS: [(u32, &str, MigrationFn); 1] = [(1, "patterns_schema", v001_patterns_schema::migrate)];

pub fn current_version(conn: &Connection) -> ApexResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);",
    )?;
    let version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .ok();
    Ok(version.unwrap_or(0))
}

/// Run every migration newer than the current version, transactionally.
/// Idempotent: re-running on an up-to-date database is a no-op.
pub fn run_migrations(conn: &Connection) -> ApexResult<u32> {
    let mut applied = 0;
    let mut version = current_version(conn)?;

    for (migration_version, name, migrate_fn) in MIGRATIONS {
        if migration_version <= version {
            continue;
        }
        debug!(migration = name, version = migration_version, "applying migration");
        conn.execute_batch("BEGIN;")?;
        if let Err(e) = migrate_fn(conn) {
            conn.execute_batch("ROLLBACK;")?;
            return Err(e);
        }
        conn.execute("DELETE FROM schema_version", [])?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [migration_version])?;
        conn.execute_batch("COMMIT;")?;
        version = migration_version;
        applied += 1;
    }

    if applied > 0 {
        info!(applied, version, "migrations applied");
    }

    Ok(applied)
}
