//! Local persistence for the catalog snapshot.
//!
//! - `KeyValueStore` is the injected storage capability (SQLite, memory, no-op)
//! - `EntityCache` keeps one timestamped snapshot of the entity list in it
//! - Every cache failure degrades to a miss; nothing here is fatal

mod entity_cache;
mod storage;
mod traits;

pub use entity_cache::{is_fresh, EntityCache};
#[cfg(test)]
pub use entity_cache::CacheEntry;
pub use storage::{MemoryStorage, NoopStorage, SqliteStorage};
pub use traits::KeyValueStore;
