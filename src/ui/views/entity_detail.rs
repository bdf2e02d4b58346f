use crate::catalog::{EntityDetail, EntitySummary, SpriteState};
use crate::ui::renderfns::{display_name, format_size, type_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Detail page for one entity. Selecting it is what triggers the fetch.
pub struct EntityDetailView {
  entity: EntitySummary,
}

impl EntityDetailView {
  pub fn new(entity: EntitySummary) -> Self {
    Self { entity }
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let store = &*ctx.store;
    let name = display_name(&self.entity.name);

    let title = if store.is_detail_loading() {
      format!(" {} (loading...) ", name)
    } else if let Some(e) = store.detail_error() {
      format!(" {} (error: {}) ", name, e)
    } else {
      format!(" {} ", name)
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if store.is_detail_loading() {
      let paragraph = Paragraph::new("Loading details...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    if let Some(error) = store.detail_error() {
      let paragraph = Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, inner);
      return;
    }

    let Some(detail) = store.detail() else {
      return;
    };

    let mut lines = detail_lines(detail);
    lines.push(Line::default());
    lines.push(sprite_line(ctx.sprites.state(self.entity.id())));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
  }
}

fn field<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
  Line::from(vec![
    Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
    value,
  ])
}

fn detail_lines(detail: &EntityDetail) -> Vec<Line<'_>> {
  let mut types = vec![Span::styled(
    format!("{:<10}", "Types"),
    Style::default().fg(Color::DarkGray),
  )];
  for (i, type_name) in detail.types.iter().enumerate() {
    if i > 0 {
      types.push(Span::raw(" "));
    }
    types.push(Span::styled(
      display_name(type_name),
      Style::default().fg(type_color(type_name)).bold(),
    ));
  }

  vec![
    field("Number", Span::styled(format!("#{}", detail.id), Style::default().fg(Color::Cyan))),
    field("Name", Span::raw(display_name(&detail.name))),
    Line::from(types),
    field("Height", Span::raw(format_height(detail.height))),
    field("Weight", Span::raw(format_weight(detail.weight))),
    field(
      "Abilities",
      Span::raw(
        detail
          .abilities
          .iter()
          .map(|a| display_name(a))
          .collect::<Vec<_>>()
          .join(", "),
      ),
    ),
  ]
}

fn sprite_line(state: Option<&SpriteState>) -> Line<'static> {
  let value = match state {
    Some(SpriteState::Ready(bytes)) => Span::styled(
      format!("loaded ({})", format_size(bytes.len())),
      Style::default().fg(Color::Green),
    ),
    Some(SpriteState::Loading) => Span::styled("loading...", Style::default().fg(Color::DarkGray)),
    Some(SpriteState::Failed(e)) => Span::styled(
      format!("unavailable ({})", e),
      Style::default().fg(Color::Red),
    ),
    None => Span::styled("not requested", Style::default().fg(Color::DarkGray)),
  };
  field("Sprite", value)
}

/// Heights arrive in decimetres
fn format_height(decimetres: u64) -> String {
  format!("{:.1} m", decimetres as f64 / 10.0)
}

/// Weights arrive in hectograms
fn format_weight(hectograms: u64) -> String {
  format!("{:.1} kg", hectograms as f64 / 10.0)
}

impl View for EntityDetailView {
  fn activate(&mut self, ctx: &mut ViewContext) {
    ctx.store.select(self.entity.clone());
    ctx.sprites.request(self.entity.id());
  }

  fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => {
        let showing = ctx.store.selected() == Some(&self.entity);
        if showing && ctx.store.detail_error().is_some() {
          ctx.store.retry_detail();
        }
        // Only re-requests when the last attempt failed
        ctx.sprites.request(self.entity.id());
        ViewAction::None
      }
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  // Coming back must not refetch the detail
  fn resume(&mut self, _ctx: &mut ViewContext) {}

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    self.render_detail(frame, area, ctx);
  }

  fn breadcrumb_label(&self) -> String {
    format!("#{} {}", self.entity.id(), display_name(&self.entity.name))
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("r", "retry").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(20),
    ]
  }
}
