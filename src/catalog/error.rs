//! Error taxonomy for catalog operations.

use thiserror::Error;

/// Failure kinds surfaced by the catalog client and cache.
///
/// Carries rendered messages rather than source errors so results can be
/// cloned into subscriber events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
  /// Unreachable host, malformed URL, timeout or non-success status
  #[error("network error: {0}")]
  Network(String),
  /// Response body did not match the expected shape
  #[error("decode error: {0}")]
  Decode(String),
  /// Persisted data unreadable or corrupt
  #[error("cache error: {0}")]
  Cache(String),
}

impl CatalogError {
  pub fn network(err: impl std::fmt::Display) -> Self {
    Self::Network(err.to_string())
  }

  pub fn decode(err: impl std::fmt::Display) -> Self {
    Self::Decode(err.to_string())
  }

  pub fn cache(err: impl std::fmt::Display) -> Self {
    Self::Cache(err.to_string())
  }
}

impl From<reqwest::Error> for CatalogError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      Self::decode(err)
    } else {
      Self::network(err)
    }
  }
}
