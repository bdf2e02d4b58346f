use super::types::{EntityList, EntitySummary};

/// Case-insensitive name search over a snapshot, keeping snapshot order.
///
/// An empty query matches everything.
pub fn filter<'a>(snapshot: &'a EntityList, query: &str) -> Vec<&'a EntitySummary> {
  if query.is_empty() {
    return snapshot.results.iter().collect();
  }

  let needle = query.to_lowercase();
  snapshot
    .results
    .iter()
    .filter(|entry| entry.name.to_lowercase().contains(&needle))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn snapshot() -> EntityList {
    let names = ["bulbasaur", "ivysaur", "venusaur", "Charmander", "flabébé"];
    EntityList {
      count: names.len() as u64,
      results: names
        .iter()
        .enumerate()
        .map(|(i, n)| EntitySummary::new(*n, format!("https://pokeapi.co/api/v2/pokemon/{}/", i + 1)))
        .collect(),
    }
  }

  fn names<'a>(entries: &[&'a EntitySummary]) -> Vec<&'a str> {
    entries.iter().map(|e| e.name.as_str()).collect()
  }

  #[test]
  fn test_empty_query_returns_all_in_order() {
    let list = snapshot();
    let result = filter(&list, "");
    assert_eq!(result.len(), list.results.len());
    assert!(result.iter().zip(&list.results).all(|(a, b)| *a == b));
  }

  #[test]
  fn test_substring_match() {
    let list = snapshot();
    assert_eq!(names(&filter(&list, "ivy")), ["ivysaur"]);
  }

  #[test]
  fn test_case_insensitive_and_ordered() {
    let list = snapshot();
    assert_eq!(names(&filter(&list, "SAUR")), ["bulbasaur", "ivysaur", "venusaur"]);
    assert_eq!(names(&filter(&list, "char")), ["Charmander"]);
  }

  #[test]
  fn test_non_ascii_names() {
    let list = snapshot();
    assert_eq!(names(&filter(&list, "BÉ")), ["flabébé"]);
  }

  #[test]
  fn test_no_match() {
    let list = snapshot();
    assert!(filter(&list, "mewtwo").is_empty());
  }
}
