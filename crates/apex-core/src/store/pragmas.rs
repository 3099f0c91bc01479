use rusqlite::Connection;

use crate::errors::ApexResult;

/// WAL mode with a busy timeout, matching the single-writer/read-pool
/// discipline this store is built around.
pub fn apply_pragmas(conn: &Connection) -> ApexResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )?;
    Ok(())
}
