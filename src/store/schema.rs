use anyhow::Result;
use rusqlite::Connection;

pub const SCHEMA_VERSION: u32 = 1;

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- one row per page view, id gives arrival order
        CREATE TABLE IF NOT EXISTS hits (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            page_no     INTEGER NOT NULL,
            session_id  TEXT NOT NULL,
            ip          TEXT,
            socket      INTEGER,
            headers     TEXT NOT NULL DEFAULT '{}',
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_hits_session ON hits(session_id, id);
        ",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}
