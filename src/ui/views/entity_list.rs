use std::ops::Range;

use crate::catalog::ListStatus;
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{describe_age, display_name, sprite_marker};
use crate::ui::view::{ShortcutInfo, ShortcutVisibility, View, ViewAction, ViewContext};
use crate::ui::views::EntityDetailView;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Root view: the searchable catalog list with a sprite marker per row
pub struct EntityListView {
  list_state: ListState,
  search: SearchInput,
  /// Ids drawn in the last frame, handed to the sprite loader on tick
  drawn_rows: Vec<String>,
}

impl EntityListView {
  pub fn new() -> Self {
    Self {
      list_state: ListState::default(),
      search: SearchInput::new(),
      drawn_rows: Vec::new(),
    }
  }

  fn reset_selection(&mut self) {
    self.list_state.select(Some(0));
    *self.list_state.offset_mut() = 0;
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let store = &*ctx.store;
    let query = self.search.query();
    let entries = store.filtered(query);

    let title = match store.status() {
      ListStatus::Loading => " Pokédex (loading...) ".to_string(),
      ListStatus::Failed(e) => format!(" Pokédex (error: {}) ", e),
      _ if query.is_empty() => format!(" Pokédex ({}) ", entries.len()),
      _ => format!(" Pokédex ({}/{}) ", entries.len(), store.snapshot().len()),
    };

    let mut block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if let Some(stored_at) = store.stored_at() {
      block = block.title_bottom(
        Line::from(format!(" updated {} ", describe_age(Utc::now() - stored_at)))
          .right_aligned()
          .style(Style::default().fg(Color::DarkGray)),
      );
    }

    if entries.is_empty() {
      self.drawn_rows.clear();
      let content = match store.status() {
        ListStatus::Loading | ListStatus::Uninitialized => "Loading catalog...".to_string(),
        ListStatus::Failed(_) if store.snapshot().is_empty() => {
          "Failed to load the catalog. Press 'r' to retry.".to_string()
        }
        _ if !query.is_empty() => format!("No matches for '{}'.", query),
        _ => "The catalog is empty.".to_string(),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = entries
      .iter()
      .map(|entity| {
        let (marker, color) = sprite_marker(ctx.sprites.state(entity.id()));
        ListItem::new(Line::from(vec![
          Span::styled(marker, Style::default().fg(color)),
          Span::raw(" "),
          Span::styled(
            format!("#{:<5}", entity.id()),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(" "),
          Span::raw(display_name(&entity.name)),
        ]))
      })
      .collect();

    ensure_valid_selection(&mut self.list_state, items.len());

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);

    // The offset is only settled after rendering
    let window = visible_window(
      self.list_state.offset(),
      area.height.saturating_sub(2) as usize,
      entries.len(),
    );
    self.drawn_rows = entries[window]
      .iter()
      .map(|entity| entity.id().to_string())
      .collect();
  }

  fn handle_overlays(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match self.search.handle_key(key) {
      KeyResult::Handled => Some(ViewAction::None),
      KeyResult::Event(SearchEvent::Changed(_)) => {
        self.reset_selection();
        Some(ViewAction::None)
      }
      KeyResult::Event(SearchEvent::Submitted) => Some(ViewAction::None),
      KeyResult::NotHandled => None,
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.list_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.list_state.select_last(),
      KeyCode::PageDown => self.list_state.scroll_down_by(10),
      KeyCode::PageUp => self.list_state.scroll_up_by(10),
      _ => return None,
    }
    Some(ViewAction::None)
  }

  fn handle_actions(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('r') => {
        ctx.store.refresh();
        Some(ViewAction::None)
      }
      KeyCode::Enter => {
        let idx = self.list_state.selected()?;
        let entity = ctx
          .store
          .filtered(self.search.query())
          .get(idx)
          .map(|entity| (*entity).clone())?;
        Some(ViewAction::Push(Box::new(EntityDetailView::new(entity))))
      }
      KeyCode::Esc if !self.search.query().is_empty() => {
        self.search.clear();
        self.reset_selection();
        Some(ViewAction::None)
      }
      KeyCode::Char('q') | KeyCode::Esc => Some(ViewAction::Pop),
      _ => None,
    }
  }
}

impl Default for EntityListView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for EntityListView {
  fn activate(&mut self, ctx: &mut ViewContext) {
    ctx.store.load_catalog();
  }

  fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> ViewAction {
    self
      .handle_overlays(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key, ctx))
      .unwrap_or(ViewAction::None)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    self.render_list(frame, area, ctx);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    match self.search.query() {
      "" => "Pokédex".to_string(),
      query => format!("Pokédex [/{}]", query),
    }
  }

  fn tick(&mut self, ctx: &mut ViewContext) {
    ctx
      .sprites
      .update_viewport(self.drawn_rows.iter().map(String::as_str));
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let active = self.search.is_active();
    [
      ShortcutInfo::new("/", "search").with_priority(10),
      ShortcutInfo::new("Enter", "details").with_priority(20),
      ShortcutInfo::new("r", "refresh").with_priority(30),
      ShortcutInfo::new("q", "quit").with_priority(40),
      ShortcutInfo::new("Enter", "apply").with_priority(10).when_active(),
      ShortcutInfo::new("Esc", "cancel").with_priority(20).when_active(),
    ]
    .into_iter()
    .filter(|s| (s.visibility == ShortcutVisibility::WhenActive) == active)
    .collect()
  }
}

/// Row indices on screen given the list scroll offset and inner height
fn visible_window(offset: usize, height: usize, len: usize) -> Range<usize> {
  let start = offset.min(len);
  let end = offset.saturating_add(height).min(len);
  start..end
}
