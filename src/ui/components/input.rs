use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Single-line text input.
///
/// The cursor counts characters, not bytes, so names like "flabébé" edit
/// correctly.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn value(&self) -> &str {
    &self.buffer
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  fn char_len(&self) -> usize {
    self.buffer.chars().count()
  }

  /// Byte offset of the character at `index` (or the end of the buffer)
  fn byte_offset(&self, index: usize) -> usize {
    self
      .buffer
      .char_indices()
      .nth(index)
      .map(|(offset, _)| offset)
      .unwrap_or(self.buffer.len())
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          let at = self.byte_offset(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.char_len() {
          let at = self.byte_offset(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Consumed
      }
      KeyCode::Right => {
        self.cursor = (self.cursor + 1).min(self.char_len());
        InputResult::Consumed
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::End => {
        self.cursor = self.char_len();
        InputResult::Consumed
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.char_len();
        InputResult::Consumed
      }
      KeyCode::Char('u') if ctrl => {
        let at = self.byte_offset(self.cursor);
        self.buffer.replace_range(..at, "");
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('w') if ctrl => {
        let end = self.byte_offset(self.cursor);
        let start = self.buffer[..end]
          .trim_end()
          .rfind(' ')
          .map(|i| i + 1)
          .unwrap_or(0);
        self.cursor -= self.buffer[start..end].chars().count();
        self.buffer.replace_range(start..end, "");
        InputResult::Consumed
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }

  /// Cursor position in characters
  pub fn cursor_position(&self) -> usize {
    self.cursor
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
  }

  fn type_str(input: &mut TextInput, s: &str) {
    for c in s.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_basic_input() {
    let mut input = TextInput::new();
    assert!(input.is_empty());

    type_str(&mut input, "pika");
    assert_eq!(input.value(), "pika");
    assert_eq!(input.cursor_position(), 4);
  }

  #[test]
  fn test_submit_and_cancel() {
    let mut input = TextInput::new();
    type_str(&mut input, "mew");

    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      InputResult::Submitted("mew".to_string())
    );
    assert_eq!(input.handle_key(key(KeyCode::Esc)), InputResult::Cancelled);
  }

  #[test]
  fn test_multibyte_editing() {
    let mut input = TextInput::new();
    type_str(&mut input, "flabébé");
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "flabéb");

    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "flabb");

    input.handle_key(key(KeyCode::Char('é')));
    assert_eq!(input.value(), "flabéb");
    assert_eq!(input.cursor_position(), 5);
  }

  #[test]
  fn test_cursor_movement_and_delete() {
    let mut input = TextInput::new();
    type_str(&mut input, "ac");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Char('b')));
    assert_eq!(input.value(), "abc");

    input.handle_key(key(KeyCode::Home));
    input.handle_key(key(KeyCode::Delete));
    assert_eq!(input.value(), "bc");

    input.handle_key(key(KeyCode::End));
    input.handle_key(key(KeyCode::Right));
    assert_eq!(input.cursor_position(), 2);
  }

  #[test]
  fn test_ctrl_u_clears_before_cursor() {
    let mut input = TextInput::new();
    type_str(&mut input, "mr mime");
    for _ in 0..4 {
      input.handle_key(key(KeyCode::Left));
    }
    input.handle_key(ctrl_key(KeyCode::Char('u')));
    assert_eq!(input.value(), "mime");
    assert_eq!(input.cursor_position(), 0);
  }

  #[test]
  fn test_ctrl_w_deletes_word() {
    let mut input = TextInput::new();
    type_str(&mut input, "tapu koko");
    input.handle_key(ctrl_key(KeyCode::Char('w')));
    assert_eq!(input.value(), "tapu ");
    assert_eq!(input.cursor_position(), 5);
  }
}
