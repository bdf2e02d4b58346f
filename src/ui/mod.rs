pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use ratatui::prelude::*;
use ratatui::widgets::ListState;

/// Screen regions: header bar, main content, footer
pub struct Areas {
  pub header: Rect,
  pub content: Rect,
  pub footer: Rect,
}

pub fn split_screen(area: Rect) -> Areas {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),
      Constraint::Min(1),
      Constraint::Length(1),
    ])
    .split(area);

  Areas {
    header: chunks[0],
    content: chunks[1],
    footer: chunks[2],
  }
}

/// Keep a list selection inside `0..len` after the underlying rows changed
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(idx) if idx < len => {}
    Some(_) => state.select(Some(len - 1)),
    None => state.select(Some(0)),
  }
}
