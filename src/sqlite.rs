// SQLite-backed key-value storage

use crate::storage::{Storage, prepare_store_dir, validate_key};
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Single `kv` table in `<root>/.taskboard/taskboard.db`
pub struct SqliteStorage {
    base_path: PathBuf,
    db: Connection,
}

impl SqliteStorage {
    /// Open or create the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_store_dir(path.as_ref())?;

        let db_path = base_path.join("taskboard.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let storage = Self { base_path, db };
        storage.create_schema()?;
        Ok(storage)
    }

    /// In-memory database, nothing touches disk
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let storage = Self {
            base_path: PathBuf::new(),
            db,
        };
        storage.create_schema()?;
        Ok(storage)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.db
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )
            .with_context(|| format!("Failed to write key {}", key))?;
        debug!(key, bytes = value.len(), "set_item: written");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_database() {
        let temp = TempDir::new().unwrap();
        let _storage = SqliteStorage::open(temp.path()).unwrap();
        assert!(temp.path().join(".taskboard/taskboard.db").exists());
    }

    #[test]
    fn test_set_get_remove() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(storage.get_item("tasks").unwrap(), None);

        storage.set_item("tasks", "[]").unwrap();
        storage.set_item("tasks", "[1]").unwrap();
        assert_eq!(storage.get_item("tasks").unwrap().as_deref(), Some("[1]"));

        storage.remove_item("tasks").unwrap();
        assert_eq!(storage.get_item("tasks").unwrap(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut storage = SqliteStorage::open(temp.path()).unwrap();
            storage.set_item("theme", "dark-theme").unwrap();
        }
        let storage = SqliteStorage::open(temp.path()).unwrap();
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark-theme"));
    }

    #[test]
    fn test_rejects_invalid_key() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.set_item("bad key", "1").is_err());
    }
}
