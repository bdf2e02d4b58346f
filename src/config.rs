use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "POKEDEX_API_URL";

/// Per-user data directory for the cache database and logs.
pub fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("pokedex"))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to "pokedex")
  pub title: Option<String>,
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  /// Page size for the list request; large enough to cover the whole catalog
  pub page_limit: u32,
  pub sprite_base_url: String,
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "https://pokeapi.co/api/v2".to_string(),
      page_limit: 1300,
      sprite_base_url: "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon"
        .to_string(),
      timeout_secs: 15,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  pub enabled: bool,
  /// Snapshot lifetime in days
  pub ttl_days: u32,
  /// SQLite file location (default: $XDG_DATA_HOME/pokedex/cache.db)
  pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      ttl_days: 30,
      path: None,
    }
  }
}

impl CacheConfig {
  pub fn ttl(&self) -> chrono::Duration {
    chrono::Duration::days(i64::from(self.ttl_days))
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./pokedex.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/pokedex/config.yaml
  ///
  /// Unlike most tools no file is fine: every key has a default.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    Ok(config.with_env_overrides(std::env::var(API_URL_ENV).ok()))
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("pokedex.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("pokedex").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file deserializes to unit, not a mapping
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(contents)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.api.page_limit == 0 {
      return Err(eyre!("api.page_limit must be greater than zero"));
    }
    url::Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("api.base_url is not a valid URL ({}): {}", self.api.base_url, e))?;
    Ok(())
  }

  fn with_env_overrides(mut self, api_url: Option<String>) -> Self {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
      self.api.base_url = url;
    }
    self
  }

  /// Apply command-line flags on top of the file and environment.
  ///
  /// Flags win over everything else, so the result is validated again.
  pub fn with_cli_overrides(mut self, api_url: Option<String>, no_cache: bool) -> Result<Self> {
    if let Some(url) = api_url {
      self.api.base_url = url;
    }
    if no_cache {
      self.cache.enabled = false;
    }
    self.validate()?;
    Ok(self)
  }

  /// Header title
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("pokedex")
  }
}
