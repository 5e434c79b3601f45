use anyhow::{Context, Result};
use rusqlite::Connection;

/// `position` preserves payload order across reads.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS launches (
    id TEXT PRIMARY KEY,
    mission_name TEXT NOT NULL,
    launch_year TEXT NOT NULL,
    launch_success INTEGER,
    details TEXT,
    position INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS cache_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Failed to create cache tables")
}
