use serde::{Deserialize, Serialize};

/// One catalog entry as returned by the list endpoint.
///
/// Equality is by `(name, source_url)`; the id is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySummary {
  pub name: String,
  #[serde(rename = "url")]
  pub source_url: String,
}

impl EntitySummary {
  #[cfg(test)]
  pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      source_url: source_url.into(),
    }
  }

  /// Id taken from the path segment right before the trailing slash,
  /// e.g. `.../pokemon/25/` -> `"25"`. Falls back to `"0"`.
  pub fn id(&self) -> &str {
    derive_id(&self.source_url)
  }
}

/// Derive an entity id from its source URL.
pub fn derive_id(source_url: &str) -> &str {
  let Some(trimmed) = source_url.strip_suffix('/') else {
    return "0";
  };
  match trimmed.rsplit('/').next() {
    Some(segment) if !segment.is_empty() => segment,
    _ => "0",
  }
}

/// Full ordered catalog snapshot, in API order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityList {
  pub count: u64,
  pub results: Vec<EntitySummary>,
}

impl EntityList {
  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }
}

/// Flattened per-entity detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDetail {
  pub id: u64,
  pub name: String,
  pub types: Vec<String>,
  pub weight: u64,
  pub height: u64,
  pub abilities: Vec<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_id_from_trailing_segment() {
    let entry = EntitySummary::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/");
    assert_eq!(entry.id(), "1");

    let entry = EntitySummary::new("calyrex", "https://pokeapi.co/api/v2/pokemon/10194/");
    assert_eq!(entry.id(), "10194");
  }

  #[test]
  fn test_id_fallback() {
    assert_eq!(derive_id(""), "0");
    assert_eq!(derive_id("/"), "0");
    assert_eq!(derive_id("https://pokeapi.co/api/v2/pokemon//"), "0");
    assert_eq!(derive_id("https://pokeapi.co/api/v2/pokemon/1"), "0");
    assert_eq!(derive_id("not a url"), "0");
  }

  #[test]
  fn test_equality_by_name_and_url() {
    let a = EntitySummary::new("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/");
    let b = EntitySummary::new("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/");
    let c = EntitySummary::new("ivysaur", "https://pokeapi.co/api/v2/pokemon/3/");
    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn test_list_uses_wire_field_names() {
    let list = EntityList {
      count: 1,
      results: vec![EntitySummary::new("mew", "https://pokeapi.co/api/v2/pokemon/151/")],
    };
    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["results"][0]["url"], "https://pokeapi.co/api/v2/pokemon/151/");
    assert!(json["results"][0].get("source_url").is_none());
  }
}
