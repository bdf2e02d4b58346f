use crate::catalog::{CatalogClient, CatalogStore, SpriteLoader};
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// When a shortcut should be shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortcutVisibility {
  #[default]
  Always,
  /// Only meaningful while a component (e.g. search) is focused
  WhenActive,
}

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub visibility: ShortcutVisibility,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      visibility: ShortcutVisibility::Always,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }

  pub const fn when_active(mut self) -> Self {
    self.visibility = ShortcutVisibility::WhenActive;
    self
  }
}

/// Shared state the views read from and drive.
///
/// The App owns the store and the sprite loader; views borrow them for the
/// duration of a key press, tick or frame.
pub struct ViewContext<'a> {
  pub store: &'a mut CatalogStore<CatalogClient>,
  pub sprites: &'a mut SpriteLoader<CatalogClient>,
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view (quits at the root)
  Pop,
}

/// Trait for view behavior
///
/// Views handle their own input modes (search) and return actions for the
/// App to execute: App → View → Components.
pub trait View {
  /// Called once when the view is pushed (or installed as root)
  fn activate(&mut self, _ctx: &mut ViewContext) {}

  /// Called when the view above this one is popped
  fn resume(&mut self, ctx: &mut ViewContext) {
    self.activate(ctx);
  }

  fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> ViewAction;

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext);

  fn breadcrumb_label(&self) -> String;

  /// Called on each tick after the store and loader have been polled
  fn tick(&mut self, _ctx: &mut ViewContext) {}

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "back").with_priority(30)]
  }
}
