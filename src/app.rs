use crate::catalog::{CatalogClient, CatalogStore, SnapshotSource, SpriteLoader, StoreEvent};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::ui::renderfns::{draw_footer, draw_header, StatusLine};
use crate::ui::view::{View, ViewAction, ViewContext};
use crate::ui::views::EntityListView;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
  config: Config,
  store: CatalogStore<CatalogClient>,
  sprites: SpriteLoader<CatalogClient>,
  store_events: mpsc::UnboundedReceiver<StoreEvent>,

  /// Navigation stack; the catalog list is always at the bottom
  view_stack: Vec<Box<dyn View>>,
  status: Option<StatusLine>,
  should_quit: bool,
}

impl App {
  pub fn new(
    config: Config,
    mut store: CatalogStore<CatalogClient>,
    sprites: SpriteLoader<CatalogClient>,
  ) -> Self {
    let store_events = store.subscribe();
    Self {
      config,
      store,
      sprites,
      store_events,
      view_stack: Vec::new(),
      status: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
  ) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);
    self.push_view(Box::new(EntityListView::new()));

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("shutting down");
    Ok(())
  }

  fn push_view(&mut self, mut view: Box<dyn View>) {
    let mut ctx = ViewContext {
      store: &mut self.store,
      sprites: &mut self.sprites,
    };
    view.activate(&mut ctx);
    debug!(view = %view.breadcrumb_label(), "view pushed");
    self.view_stack.push(view);
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let Some(view) = self.view_stack.last_mut() else {
      return;
    };
    let mut ctx = ViewContext {
      store: &mut self.store,
      sprites: &mut self.sprites,
    };

    match view.handle_key(key, &mut ctx) {
      ViewAction::None => {}
      ViewAction::Push(next) => self.push_view(next),
      ViewAction::Pop => self.pop_view(),
    }
  }

  /// Pop the top view and resume the one underneath. Popping the root quits.
  fn pop_view(&mut self) {
    if self.view_stack.len() <= 1 {
      self.should_quit = true;
      return;
    }
    self.view_stack.pop();

    if let Some(view) = self.view_stack.last_mut() {
      let mut ctx = ViewContext {
        store: &mut self.store,
        sprites: &mut self.sprites,
      };
      view.resume(&mut ctx);
      debug!(view = %view.breadcrumb_label(), "view resumed");
    }
  }

  fn tick(&mut self) {
    self.store.poll();
    self.sprites.poll();

    while let Ok(event) = self.store_events.try_recv() {
      if let Some(status) = status_for(&event) {
        self.status = Some(status);
      }
    }

    if let Some(view) = self.view_stack.last_mut() {
      let mut ctx = ViewContext {
        store: &mut self.store,
        sprites: &mut self.sprites,
      };
      view.tick(&mut ctx);
    }
  }

  fn draw(&mut self, frame: &mut Frame) {
    let areas = ui::split_screen(frame.area());
    let breadcrumb: Vec<String> = self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect();

    let Some(view) = self.view_stack.last_mut() else {
      return;
    };

    draw_header(
      frame,
      areas.header,
      self.config.title(),
      &self.config.api.base_url,
      &view.shortcuts(),
    );

    let ctx = ViewContext {
      store: &mut self.store,
      sprites: &mut self.sprites,
    };
    view.render(frame, areas.content, &ctx);

    draw_footer(frame, areas.footer, &breadcrumb, self.status.as_ref());
  }
}

/// Footer message for a store transition, if it is worth one
fn status_for(event: &StoreEvent) -> Option<StatusLine> {
  let (text, is_error) = match event {
    StoreEvent::ListLoading => ("Loading catalog...".to_string(), false),
    StoreEvent::ListReady {
      entries,
      source: SnapshotSource::Cache,
    } => (format!("{} entries from cache", entries), false),
    StoreEvent::ListReady {
      entries,
      source: SnapshotSource::Network,
    } => (format!("{} entries fetched", entries), false),
    StoreEvent::ListFailed(e) => (format!("Catalog load failed: {}", e), true),
    StoreEvent::DetailFailed { entity, error } => {
      (format!("Could not load {}: {}", entity.name, error), true)
    }
    StoreEvent::Selected(_) | StoreEvent::DetailLoaded(_) => return None,
  };
  Some(StatusLine { text, is_error })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{EntityCache, MemoryStorage};
  use crate::catalog::{CatalogError, EntityList, EntitySummary, ListStatus, StoreOptions};
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  /// Pops on any key and counts its activations
  struct CountingView {
    activations: Arc<AtomicUsize>,
  }

  impl View for CountingView {
    fn activate(&mut self, _ctx: &mut ViewContext) {
      self.activations.fetch_add(1, Ordering::SeqCst);
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut ViewContext) -> ViewAction {
      ViewAction::Pop
    }

    fn render(&mut self, _frame: &mut Frame, _area: Rect, _ctx: &ViewContext) {}

    fn breadcrumb_label(&self) -> String {
      "counting".to_string()
    }
  }

  fn counting(activations: &Arc<AtomicUsize>) -> Box<dyn View> {
    Box::new(CountingView {
      activations: Arc::clone(activations),
    })
  }

  /// App over a memory cache already holding a fresh snapshot
  fn app_with_cached_catalog() -> App {
    let config = Config::default();
    let client = Arc::new(CatalogClient::new(&config.api).unwrap());
    let cache = EntityCache::new(Arc::new(MemoryStorage::new()), "test");
    cache.save(&EntityList {
      count: 1,
      results: vec![EntitySummary::new(
        "bulbasaur",
        "https://pokeapi.co/api/v2/pokemon/1/",
      )],
    });

    let store = CatalogStore::new(Arc::clone(&client), cache, StoreOptions::default());
    App::new(config, store, SpriteLoader::new(client))
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[tokio::test]
  async fn test_pop_resumes_view_underneath() {
    let mut app = app_with_cached_catalog();
    let root = Arc::new(AtomicUsize::new(0));
    let top = Arc::new(AtomicUsize::new(0));

    app.push_view(counting(&root));
    app.push_view(counting(&top));
    assert_eq!(root.load(Ordering::SeqCst), 1);

    app.handle_key(key(KeyCode::Char('q')));

    assert_eq!(app.view_stack.len(), 1);
    assert_eq!(root.load(Ordering::SeqCst), 2);
    assert_eq!(top.load(Ordering::SeqCst), 1);
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_returning_to_list_loads_catalog() {
    let mut app = app_with_cached_catalog();
    // Installed without activation, so nothing has loaded yet
    app.view_stack.push(Box::new(EntityListView::new()));
    app.push_view(counting(&Arc::new(AtomicUsize::new(0))));
    assert_eq!(app.store.status(), &ListStatus::Uninitialized);

    app.handle_key(key(KeyCode::Esc));

    assert_eq!(app.store.status(), &ListStatus::Ready);
    assert_eq!(app.store.snapshot().len(), 1);
  }

  #[tokio::test]
  async fn test_popping_root_quits() {
    let mut app = app_with_cached_catalog();
    app.push_view(counting(&Arc::new(AtomicUsize::new(0))));

    app.handle_key(key(KeyCode::Char('q')));

    assert!(app.should_quit);
    assert_eq!(app.view_stack.len(), 1);
  }

  #[test]
  fn test_status_for_list_events() {
    let ready = status_for(&StoreEvent::ListReady {
      entries: 1302,
      source: SnapshotSource::Cache,
    });
    assert_eq!(
      ready,
      Some(StatusLine {
        text: "1302 entries from cache".to_string(),
        is_error: false,
      })
    );

    let failed = status_for(&StoreEvent::ListFailed(CatalogError::network("timed out")));
    assert!(failed.is_some_and(|s| s.is_error));
  }

  #[test]
  fn test_status_for_detail_events() {
    let entity = EntitySummary::new("mew", "https://pokeapi.co/api/v2/pokemon/151/");
    assert_eq!(status_for(&StoreEvent::Selected(entity.clone())), None);

    let failed = status_for(&StoreEvent::DetailFailed {
      entity,
      error: CatalogError::decode("missing field `types`"),
    });
    assert!(failed.is_some_and(|s| s.is_error && s.text.starts_with("Could not load mew")));
  }
}
