//! Timestamped snapshot of the entity list on top of a key-value slot.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

use super::traits::KeyValueStore;
use crate::catalog::{CatalogError, EntityList};

/// Persisted snapshot plus the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
  pub snapshot: EntityList,
  pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
  pub fn is_valid(&self, ttl: Duration) -> bool {
    is_fresh(self.stored_at, ttl)
  }

  pub fn age(&self) -> Duration {
    Utc::now() - self.stored_at
  }
}

/// `now - stored_at < ttl`
pub fn is_fresh(stored_at: DateTime<Utc>, ttl: Duration) -> bool {
  Utc::now() - stored_at < ttl
}

/// Best-effort cache for the entity list snapshot.
///
/// The snapshot and its timestamp live in one combined record, so a write
/// either replaces both or leaves the previous entry in place.
#[derive(Clone)]
pub struct EntityCache {
  store: Arc<dyn KeyValueStore>,
  key: String,
}

impl EntityCache {
  /// `namespace` identifies the data source; snapshots from different
  /// sources never collide.
  pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
    Self {
      store,
      key: slot_key(namespace),
    }
  }

  /// Name of the backing slot
  #[cfg(test)]
  pub fn slot(&self) -> &str {
    &self.key
  }

  /// The persisted entry, or `None` on a miss or unreadable data.
  pub fn load(&self) -> Option<CacheEntry> {
    match self.try_load() {
      Ok(entry) => entry,
      Err(e) => {
        warn!(error = %e, "ignoring unreadable cache entry");
        None
      }
    }
  }

  /// Persist `snapshot` stamped with the current time. Failures are logged.
  pub fn save(&self, snapshot: &EntityList) {
    self.store_entry(&CacheEntry {
      snapshot: snapshot.clone(),
      stored_at: Utc::now(),
    });
  }

  /// Persist a complete entry as-is.
  pub fn store_entry(&self, entry: &CacheEntry) {
    if let Err(e) = self.try_store(entry) {
      warn!(error = %e, "failed to write cache entry");
    }
  }

  fn try_load(&self) -> Result<Option<CacheEntry>, CatalogError> {
    let Some(bytes) = self.store.get(&self.key).map_err(CatalogError::cache)? else {
      debug!(key = %self.key, "cache miss");
      return Ok(None);
    };
    let entry = serde_json::from_slice(&bytes).map_err(CatalogError::cache)?;
    Ok(Some(entry))
  }

  fn try_store(&self, entry: &CacheEntry) -> Result<(), CatalogError> {
    let bytes = serde_json::to_vec(entry).map_err(CatalogError::cache)?;
    self.store.set(&self.key, &bytes).map_err(CatalogError::cache)?;
    debug!(key = %self.key, entries = entry.snapshot.len(), "cache entry written");
    Ok(())
  }
}

/// Stable, fixed-length slot key for a data source.
fn slot_key(namespace: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(namespace.as_bytes());
  format!("entity_list:{}", hex::encode(hasher.finalize()))
}
