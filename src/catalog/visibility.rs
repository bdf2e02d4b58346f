use std::collections::HashSet;

/// Rows that were shown or hidden by a viewport update
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ViewportChange {
  pub appeared: Vec<String>,
  pub disappeared: Vec<String>,
}

/// Set of list rows currently on screen, keyed by entity id.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
  visible: HashSet<String>,
}

impl VisibilityTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns true if the row was not already visible.
  pub fn mark_visible(&mut self, row_id: &str) -> bool {
    self.visible.insert(row_id.to_string())
  }

  /// Returns true if the row was visible.
  pub fn mark_hidden(&mut self, row_id: &str) -> bool {
    self.visible.remove(row_id)
  }

  pub fn is_visible(&self, row_id: &str) -> bool {
    self.visible.contains(row_id)
  }

  pub fn visible(&self) -> impl Iterator<Item = &str> {
    self.visible.iter().map(String::as_str)
  }

  /// Compare the rows currently drawn against the visible set.
  ///
  /// Nothing is changed; callers apply the result through `mark_visible`
  /// and `mark_hidden`.
  pub fn diff<'a>(&self, rows: impl IntoIterator<Item = &'a str>) -> ViewportChange {
    let mut drawn: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for id in rows {
      if seen.insert(id) {
        drawn.push(id);
      }
    }

    let disappeared = self
      .visible()
      .filter(|id| !seen.contains(id))
      .map(String::from)
      .collect();
    let appeared = drawn
      .into_iter()
      .filter(|id| !self.is_visible(id))
      .map(String::from)
      .collect();

    ViewportChange {
      appeared,
      disappeared,
    }
  }
}
