//! PokeAPI catalog: wire types, HTTP client and the state layer the UI reads.

pub mod api_types;
pub mod client;
pub mod error;
pub mod filter;
pub mod sprites;
pub mod store;
pub mod types;
pub mod visibility;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use sprites::{SpriteLoader, SpriteState};
pub use store::{CatalogStore, ListStatus, SnapshotSource, StoreEvent, StoreOptions};
pub use types::{EntityDetail, EntityList, EntitySummary};
