use std::future::Future;
use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;

use super::api_types::{decode_detail, decode_list};
use super::error::CatalogError;
use super::types::{EntityDetail, EntityList};

/// Remote source of catalog data.
///
/// Implementations make a single attempt per call; retrying is the
/// caller's decision.
pub trait CatalogSource: Send + Sync + 'static {
  fn fetch_list(
    &self,
    page_limit: u32,
  ) -> impl Future<Output = Result<EntityList, CatalogError>> + Send;

  fn fetch_detail(
    &self,
    source_url: &str,
  ) -> impl Future<Output = Result<EntityDetail, CatalogError>> + Send;
}

/// Remote source of sprite image bytes, keyed by entity id.
pub trait SpriteSource: Send + Sync + 'static {
  fn fetch_sprite(&self, id: &str) -> impl Future<Output = Result<Vec<u8>, CatalogError>> + Send;
}

/// PokeAPI HTTP client
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  base_url: String,
  sprite_base_url: String,
}

impl CatalogClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      sprite_base_url: config.sprite_base_url.trim_end_matches('/').to_string(),
    })
  }

  /// `<base>/pokemon?limit=<N>`
  pub fn list_url(&self, page_limit: u32) -> Result<Url, CatalogError> {
    Url::parse_with_params(
      &format!("{}/pokemon", self.base_url),
      &[("limit", page_limit.to_string())],
    )
    .map_err(|e| CatalogError::Network(format!("invalid list URL: {}", e)))
  }

  /// `<sprite base>/<id>.png`
  pub fn sprite_url(&self, id: &str) -> Result<Url, CatalogError> {
    Url::parse(&format!("{}/{}.png", self.sprite_base_url, id))
      .map_err(|e| CatalogError::Network(format!("invalid sprite URL: {}", e)))
  }

  /// GET a URL and return the body of a successful response
  async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, CatalogError> {
    debug!(%url, "GET");
    let response = self.http.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    Ok(body.to_vec())
  }
}

impl CatalogSource for CatalogClient {
  async fn fetch_list(&self, page_limit: u32) -> Result<EntityList, CatalogError> {
    let url = self.list_url(page_limit)?;
    let body = self.get_bytes(url).await?;
    decode_list(&body)
  }

  async fn fetch_detail(&self, source_url: &str) -> Result<EntityDetail, CatalogError> {
    let url = Url::parse(source_url)
      .map_err(|e| CatalogError::Network(format!("invalid detail URL {:?}: {}", source_url, e)))?;
    let body = self.get_bytes(url).await?;
    decode_detail(&body)
  }
}

impl SpriteSource for CatalogClient {
  async fn fetch_sprite(&self, id: &str) -> Result<Vec<u8>, CatalogError> {
    let url = self.sprite_url(id)?;
    self.get_bytes(url).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client() -> CatalogClient {
    CatalogClient::new(&ApiConfig {
      base_url: "https://pokeapi.co/api/v2/".to_string(),
      ..ApiConfig::default()
    })
    .unwrap()
  }

  #[test]
  fn test_list_url() {
    let url = client().list_url(1300).unwrap();
    assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/pokemon?limit=1300");
  }

  #[test]
  fn test_sprite_url() {
    let url = client().sprite_url("25").unwrap();
    assert_eq!(
      url.as_str(),
      "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
    );
  }

  #[test]
  fn test_malformed_base_is_network_error() {
    let client = CatalogClient::new(&ApiConfig {
      base_url: "::not a url::".to_string(),
      ..ApiConfig::default()
    })
    .unwrap();
    assert!(matches!(client.list_url(10), Err(CatalogError::Network(_))));
  }

  #[tokio::test]
  async fn test_malformed_detail_url_fails_fast() {
    let err = client().fetch_detail("pokemon/1/").await.unwrap_err();
    assert!(matches!(err, CatalogError::Network(_)));
  }
}
