use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "history.sqlite";

/// Open (or create) the history database inside `dir` and make sure the
/// schema exists.
pub fn open_history(dir: &Path) -> Result<Connection> {
    let conn = Connection::open(dir.join(DB_FILE_NAME))
        .context("failed to open SQLite database")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Create the history table if this is a fresh database.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS searches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist TEXT NOT NULL COLLATE NOCASE,
            song TEXT NOT NULL COLLATE NOCASE,
            recency INTEGER NOT NULL,
            UNIQUE (artist, song)
        )",
        [],
    )
    .context("failed to create searches table")?;
    Ok(())
}
