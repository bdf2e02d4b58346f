//! Persistence capability the cache is built on.

use color_eyre::Result;

/// Named byte slots.
///
/// A single `set` is atomic: readers see either the old value or the new
/// one, never a mix.
pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

  fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}
