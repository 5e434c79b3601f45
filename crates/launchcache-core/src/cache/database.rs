use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::models::LaunchRecord;

use super::schema;

/// `cache_meta` key holding the last replacement time (RFC 3339)
const REFRESHED_AT_KEY: &str = "refreshed_at";

/// SQLite store for the cached launch list.
///
/// Every operation takes the connection mutex, so a `replace_launches` is
/// never observed half-done by a concurrent reader. Clone shares the
/// connection.
#[derive(Clone)]
pub struct LaunchDatabase {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl LaunchDatabase {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open launch cache at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        schema::create_tables(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::create_tables(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Launch cache lock poisoned"))
    }

    // ===== Launches =====

    pub fn get_all_launches(&self) -> Result<Vec<LaunchRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, mission_name, launch_year, launch_success, details
             FROM launches ORDER BY position",
        )?;

        let launches = stmt
            .query_map([], |row| {
                Ok(LaunchRecord {
                    id: row.get(0)?,
                    mission_name: row.get(1)?,
                    launch_year: row.get(2)?,
                    launch_success: row.get(3)?,
                    details: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read cached launches")?;

        Ok(launches)
    }

    pub fn count_launches(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM launches", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Remove every cached launch. Returns the number of rows deleted.
    pub fn clear_launches(&self) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM launches", [])?;
        tx.execute("DELETE FROM cache_meta WHERE key = ?1", [REFRESHED_AT_KEY])?;
        tx.commit()?;
        debug!(deleted, "Launch cache cleared");
        Ok(deleted)
    }

    /// Append launches after the ones already cached. Fails, inserting
    /// nothing, if any id is already present.
    pub fn insert_launches(&self, launches: &[LaunchRecord]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM launches",
            [],
            |row| row.get(0),
        )?;
        insert_rows(&tx, launches, next).context("Failed to insert launches")?;
        tx.commit()?;
        Ok(())
    }

    /// Replace the cache with `launches` in one transaction and stamp the
    /// refresh time. On any failure the previous contents are kept.
    pub fn replace_launches(&self, launches: &[LaunchRecord]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM launches", [])?;
        insert_rows(&tx, launches, 0).context("Failed to insert launches")?;
        tx.execute(
            "INSERT OR REPLACE INTO cache_meta (key, value) VALUES (?1, ?2)",
            params![REFRESHED_AT_KEY, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        debug!(count = launches.len(), "Launch cache replaced");
        Ok(())
    }

    /// When the cache was last replaced from a remote fetch
    pub fn last_refreshed(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.lock()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM cache_meta WHERE key = ?1",
                [REFRESHED_AT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|v| {
                DateTime::parse_from_rfc3339(&v)
                    .map(|dt| dt.with_timezone(&Utc))
                    .with_context(|| format!("Invalid refresh timestamp in cache: {}", v))
            })
            .transpose()
    }
}

fn insert_rows(conn: &Connection, launches: &[LaunchRecord], start: i64) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO launches
             (id, mission_name, launch_year, launch_success, details, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for (offset, launch) in launches.iter().enumerate() {
        stmt.execute(params![
            launch.id,
            launch.mission_name,
            launch.launch_year,
            launch.launch_success,
            launch.details,
            start + offset as i64,
        ])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{falcon_1, sample_launches};

    fn test_db() -> LaunchDatabase {
        LaunchDatabase::open_memory().expect("Failed to create in-memory database")
    }

    #[test]
    fn test_empty_database() {
        let db = test_db();
        assert!(db.get_all_launches().expect("Query failed").is_empty());
        assert_eq!(db.count_launches().expect("Query failed"), 0);
        assert!(db.last_refreshed().expect("Query failed").is_none());
        assert!(db.path().is_none());
    }

    #[test]
    fn test_insert_and_read_preserves_order_and_fields() {
        let db = test_db();
        let launches = sample_launches();
        db.insert_launches(&launches).expect("Insert failed");

        let stored = db.get_all_launches().expect("Query failed");
        assert_eq!(stored, launches);
    }

    #[test]
    fn test_insert_appends_after_existing() {
        let db = test_db();
        db.insert_launches(&[falcon_1()]).expect("Insert failed");
        db.insert_launches(&[LaunchRecord::new("2", "DemoSat", "2007", None, None)])
            .expect("Insert failed");

        let ids: Vec<String> = db
            .get_all_launches()
            .expect("Query failed")
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_clear_launches() {
        let db = test_db();
        db.replace_launches(&sample_launches()).expect("Replace failed");

        let deleted = db.clear_launches().expect("Clear failed");
        assert_eq!(deleted, 3);
        assert!(db.get_all_launches().expect("Query failed").is_empty());
        assert!(db.last_refreshed().expect("Query failed").is_none());
    }

    #[test]
    fn test_replace_removes_old_records() {
        let db = test_db();
        db.replace_launches(&sample_launches()).expect("Replace failed");

        let fresh = vec![LaunchRecord::new("200", "Crew-9", "2024", Some(true), None)];
        db.replace_launches(&fresh).expect("Replace failed");

        assert_eq!(db.get_all_launches().expect("Query failed"), fresh);
    }

    #[test]
    fn test_replace_stamps_refresh_time() {
        let db = test_db();
        let before = Utc::now() - chrono::Duration::seconds(1);
        db.replace_launches(&[falcon_1()]).expect("Replace failed");

        let refreshed = db
            .last_refreshed()
            .expect("Query failed")
            .expect("Refresh time missing");
        assert!(refreshed >= before);
    }

    #[test]
    fn test_replace_with_duplicate_ids_keeps_previous_contents() {
        let db = test_db();
        db.replace_launches(&sample_launches()).expect("Replace failed");
        let refreshed_before = db.last_refreshed().expect("Query failed");

        let launches = vec![
            LaunchRecord::new("1", "Old name", "2006", None, None),
            LaunchRecord::new("1", "Falcon 1", "2006", Some(false), None),
        ];
        assert!(db.replace_launches(&launches).is_err());

        assert_eq!(db.get_all_launches().expect("Query failed"), sample_launches());
        assert_eq!(db.last_refreshed().expect("Query failed"), refreshed_before);
    }

    #[test]
    fn test_replace_rolls_back_when_stamp_fails() {
        let db = test_db();
        db.replace_launches(&sample_launches()).expect("Replace failed");
        db.lock()
            .expect("Lock failed")
            .execute("DROP TABLE cache_meta", [])
            .expect("Drop failed");

        assert!(db.replace_launches(&[falcon_1()]).is_err());
        assert_eq!(db.get_all_launches().expect("Query failed"), sample_launches());
    }

    #[test]
    fn test_insert_existing_id_inserts_nothing() {
        let db = test_db();
        db.insert_launches(&[falcon_1()]).expect("Insert failed");

        let batch = vec![
            LaunchRecord::new("2", "DemoSat", "2007", Some(false), None),
            falcon_1(),
        ];
        assert!(db.insert_launches(&batch).is_err());
        assert_eq!(db.get_all_launches().expect("Query failed"), vec![falcon_1()]);
    }

    #[test]
    fn test_file_database_persists_across_opens() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("launches.db");

        {
            let db = LaunchDatabase::open(path.clone()).expect("Failed to open database");
            db.replace_launches(&sample_launches()).expect("Replace failed");
            assert_eq!(db.path(), Some(path.as_path()));
        }

        let reopened = LaunchDatabase::open(path).expect("Failed to reopen database");
        assert_eq!(reopened.get_all_launches().expect("Query failed"), sample_launches());
        assert!(reopened.last_refreshed().expect("Query failed").is_some());
    }

    #[test]
    fn test_clones_share_connection() {
        let db = test_db();
        let other = db.clone();
        db.replace_launches(&[falcon_1()]).expect("Replace failed");
        assert_eq!(other.count_launches().expect("Query failed"), 1);
    }
}
