use ratatui::prelude::Color;

use crate::catalog::SpriteState;

/// Truncate to `max_len` characters, ending in "..." when cut
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Title-case an API slug for display: "mr-mime" -> "Mr-Mime"
pub fn display_name(slug: &str) -> String {
  let mut out = String::with_capacity(slug.len());
  let mut word_start = true;
  for c in slug.chars() {
    if word_start {
      out.extend(c.to_uppercase());
    } else {
      out.push(c);
    }
    word_start = c == '-' || c == ' ';
  }
  out
}

/// Display color for an elemental type name
pub fn type_color(type_name: &str) -> Color {
  match type_name {
    "fire" => Color::Red,
    "water" | "ice" => Color::Blue,
    "grass" | "bug" => Color::Green,
    "electric" => Color::Yellow,
    "psychic" | "fairy" => Color::Magenta,
    "poison" | "ghost" | "dragon" => Color::LightMagenta,
    "ground" | "rock" | "fighting" => Color::LightRed,
    "flying" => Color::LightCyan,
    "dark" | "steel" => Color::Gray,
    _ => Color::White,
  }
}

/// One-cell marker for a row's sprite load state
pub fn sprite_marker(state: Option<&SpriteState>) -> (&'static str, Color) {
  match state {
    Some(SpriteState::Ready(_)) => ("●", Color::Green),
    Some(SpriteState::Loading) => ("…", Color::DarkGray),
    Some(SpriteState::Failed(_)) => ("✗", Color::Red),
    None => (" ", Color::Reset),
  }
}

/// Short relative age, e.g. "3d ago"
pub fn describe_age(age: chrono::Duration) -> String {
  if age.num_days() > 0 {
    format!("{}d ago", age.num_days())
  } else if age.num_hours() > 0 {
    format!("{}h ago", age.num_hours())
  } else if age.num_minutes() > 0 {
    format!("{}m ago", age.num_minutes())
  } else {
    "just now".to_string()
  }
}

/// Human-readable byte count
pub fn format_size(bytes: usize) -> String {
  if bytes < 1024 {
    format!("{} B", bytes)
  } else {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
  }
}
