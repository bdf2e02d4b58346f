use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar: app title, API host and the active view's shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  api_url: &str,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", extract_host(api_url)),
      Style::default().fg(Color::White),
    ),
    Span::raw(" "),
  ];

  let mut shortcuts: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  shortcuts.sort_by_key(|s| s.priority);

  for shortcut in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn extract_host(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_host() {
    assert_eq!(extract_host("https://pokeapi.co/api/v2"), "pokeapi.co");
    assert_eq!(extract_host("http://localhost:8080"), "localhost:8080");
    assert_eq!(extract_host("pokeapi.co"), "pokeapi.co");
  }
}
