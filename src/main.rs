mod app;
mod cache;
mod catalog;
mod config;
mod event;
mod logging;
mod ui;

use cache::{EntityCache, KeyValueStore, MemoryStorage, NoopStorage, SqliteStorage};
use catalog::{CatalogClient, CatalogStore, SpriteLoader, StoreOptions};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the PokeAPI catalog from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./pokedex.yaml or $XDG_CONFIG_HOME/pokedex/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overrides the config file and POKEDEX_API_URL
  #[arg(long)]
  api_url: Option<String>,

  /// Skip the on-disk snapshot cache for this run
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?
    .with_cli_overrides(args.api_url, args.no_cache)?;

  let _log_guard = logging::init(&config::data_dir()?.join("logs"))?;
  info!(base_url = %config.api.base_url, "starting");

  let client = Arc::new(CatalogClient::new(&config.api)?);
  let cache = EntityCache::new(open_storage(&config.cache), &snapshot_namespace(&config.api));
  let store = CatalogStore::new(
    Arc::clone(&client),
    cache,
    StoreOptions {
      page_limit: config.api.page_limit,
      cache_ttl: config.cache.ttl(),
    },
  );
  let sprites = SpriteLoader::new(client);

  let mut app = app::App::new(config, store, sprites);
  app.run().await?;

  Ok(())
}

/// Pick the snapshot backend. A broken database degrades to memory.
fn open_storage(cache: &config::CacheConfig) -> Arc<dyn KeyValueStore> {
  if !cache.enabled {
    info!("snapshot cache disabled");
    return Arc::new(NoopStorage);
  }

  match SqliteStorage::open(cache.path.as_deref()) {
    Ok(storage) => Arc::new(storage),
    Err(e) => {
      warn!(error = %e, "could not open cache database, using memory");
      Arc::new(MemoryStorage::new())
    }
  }
}

/// Snapshots from different endpoints or page sizes never share a slot
fn snapshot_namespace(api: &config::ApiConfig) -> String {
  format!(
    "{}/pokemon?limit={}",
    api.base_url.trim_end_matches('/'),
    api.page_limit
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_args_parse() {
    let args = Args::try_parse_from(["pokedex", "--api-url", "http://localhost:8000/api/v2", "--no-cache"])
      .unwrap();
    assert_eq!(args.api_url.as_deref(), Some("http://localhost:8000/api/v2"));
    assert!(args.no_cache);
    assert!(args.config.is_none());
  }

  #[test]
  fn test_parsed_flags_override_config() {
    let args = Args::try_parse_from(["pokedex", "--api-url", "http://localhost:8000/api/v2", "--no-cache"])
      .unwrap();
    let config = config::Config::default()
      .with_cli_overrides(args.api_url, args.no_cache)
      .unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000/api/v2");
    assert!(!config.cache.enabled);
  }

  #[test]
  fn test_snapshot_namespace_tracks_endpoint_and_limit() {
    let mut api = config::ApiConfig::default();
    let a = snapshot_namespace(&api);
    assert_eq!(a, "https://pokeapi.co/api/v2/pokemon?limit=1300");

    api.page_limit = 151;
    assert_ne!(snapshot_namespace(&api), a);
  }

  #[test]
  fn test_disabled_cache_uses_noop() {
    let cache = config::CacheConfig {
      enabled: false,
      ..config::CacheConfig::default()
    };
    let storage = open_storage(&cache);
    storage.set("k", b"v").unwrap();
    assert_eq!(storage.get("k").unwrap(), None);
  }
}
