//! Key-value storage backends.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::KeyValueStore;

/// Storage implementation that doesn't keep anything.
/// Used when caching is disabled - every read misses.
pub struct NoopStorage;

impl KeyValueStore for NoopStorage {
  fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
    Ok(None) // Always miss
  }

  fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
    Ok(()) // Discard
  }
}

/// Process-local storage, lost on exit.
#[derive(Default)]
pub struct MemoryStorage {
  slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
    let slots = self
      .slots
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(slots.get(key).cloned())
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<()> {
    let mut slots = self
      .slots
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    slots.insert(key.to_string(), value.to_vec());
    Ok(())
  }
}

/// SQLite-based storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open the database at `path`, or at the default location.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Throwaway database, used by tests.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn =
      Connection::open_in_memory().map_err(|e| eyre!("Failed to open in-memory cache: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    Ok(crate::config::data_dir()?.join("cache.db"))
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    written_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl KeyValueStore for SqliteStorage {
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT value FROM kv_store WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read cache slot {}: {}", key, e))
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    // One statement, so the slot flips atomically
    conn
      .execute(
        "INSERT OR REPLACE INTO kv_store (key, value, written_at)
         VALUES (?, ?, datetime('now'))",
        params![key, value],
      )
      .map_err(|e| eyre!("Failed to write cache slot {}: {}", key, e))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn round_trip(store: &dyn KeyValueStore) {
    assert_eq!(store.get("slot").unwrap(), None);

    store.set("slot", b"first").unwrap();
    assert_eq!(store.get("slot").unwrap().as_deref(), Some(&b"first"[..]));

    store.set("slot", b"second").unwrap();
    assert_eq!(store.get("slot").unwrap().as_deref(), Some(&b"second"[..]));

    assert_eq!(store.get("other").unwrap(), None);
  }

  #[test]
  fn test_memory_round_trip() {
    round_trip(&MemoryStorage::new());
  }

  #[test]
  fn test_sqlite_round_trip() {
    round_trip(&SqliteStorage::open_in_memory().unwrap());
  }

  #[test]
  fn test_sqlite_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache.db");

    {
      let store = SqliteStorage::open(Some(&path)).unwrap();
      store.set("entity_list", b"{}").unwrap();
    }

    let store = SqliteStorage::open(Some(&path)).unwrap();
    assert_eq!(store.get("entity_list").unwrap().as_deref(), Some(&b"{}"[..]));
  }

  #[test]
  fn test_noop_always_misses() {
    let store = NoopStorage;
    store.set("slot", b"value").unwrap();
    assert_eq!(store.get("slot").unwrap(), None);
  }
}
