//! Serde-deserializable types matching PokeAPI responses.
//!
//! The detail endpoint nests every name inside a wrapper object; these types
//! mirror that shape and flatten it into domain types on conversion.

use serde::Deserialize;

use super::error::CatalogError;
use super::types::{EntityDetail, EntityList};

// ============================================================================
// Common nested field types
// ============================================================================

/// `{ "name": ..., "url": ... }` reference used all over PokeAPI
#[derive(Debug, Deserialize)]
pub struct ApiNamedResource {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiTypeSlot {
  #[serde(rename = "type")]
  pub type_ref: ApiNamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiAbilitySlot {
  pub ability: ApiNamedResource,
}

// ============================================================================
// Detail endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiEntityDetail {
  pub id: u64,
  pub name: String,
  pub types: Vec<ApiTypeSlot>,
  pub weight: u64,
  pub height: u64,
  pub abilities: Vec<ApiAbilitySlot>,
}

impl From<ApiEntityDetail> for EntityDetail {
  fn from(api: ApiEntityDetail) -> Self {
    EntityDetail {
      id: api.id,
      name: api.name,
      types: api.types.into_iter().map(|t| t.type_ref.name).collect(),
      weight: api.weight,
      height: api.height,
      abilities: api.abilities.into_iter().map(|a| a.ability.name).collect(),
    }
  }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a list endpoint body. The wire shape is the domain shape.
pub fn decode_list(body: &[u8]) -> Result<EntityList, CatalogError> {
  serde_json::from_slice(body).map_err(CatalogError::decode)
}

/// Decode a detail endpoint body and flatten it.
pub fn decode_detail(body: &[u8]) -> Result<EntityDetail, CatalogError> {
  serde_json::from_slice::<ApiEntityDetail>(body)
    .map(EntityDetail::from)
    .map_err(CatalogError::decode)
}
