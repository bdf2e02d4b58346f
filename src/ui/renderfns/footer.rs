use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::utils::truncate;

/// Status line text and whether it reports a problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
  pub text: String,
  pub is_error: bool,
}

/// Draw the breadcrumb on the left and the latest status on the right
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], status: Option<&StatusLine>) {
  let crumbs = breadcrumb.join(" › ");

  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  frame.render_widget(
    Paragraph::new(format!(" {}", crumbs)).style(Style::default().fg(Color::Cyan)),
    chunks[0],
  );

  if let Some(status) = status {
    let color = if status.is_error {
      Color::Red
    } else {
      Color::DarkGray
    };
    let text = truncate(&status.text, chunks[1].width.saturating_sub(1) as usize);
    frame.render_widget(
      Paragraph::new(format!("{} ", text))
        .alignment(Alignment::Right)
        .style(Style::default().fg(color)),
      chunks[1],
    );
  }
}
