//! Lazy sprite loading gated by row visibility.
//!
//! A row's sprite is requested when the row scrolls into view and nothing is
//! cached for it yet. Scrolling it out aborts the fetch and forgets a failed
//! attempt, so coming back into view tries again.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::client::SpriteSource;
use super::error::CatalogError;
use super::visibility::VisibilityTracker;

/// Load state of one sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteState {
  Loading,
  Ready(Arc<[u8]>),
  Failed(CatalogError),
}

struct SpriteFetched {
  id: String,
  ticket: u64,
  result: Result<Vec<u8>, CatalogError>,
}

struct InFlight {
  ticket: u64,
  handle: JoinHandle<()>,
}

pub struct SpriteLoader<S: SpriteSource> {
  source: Arc<S>,
  visibility: VisibilityTracker,
  sprites: HashMap<String, SpriteState>,
  in_flight: HashMap<String, InFlight>,
  next_ticket: u64,
  tx: mpsc::UnboundedSender<SpriteFetched>,
  rx: mpsc::UnboundedReceiver<SpriteFetched>,
}

impl<S: SpriteSource> SpriteLoader<S> {
  pub fn new(source: Arc<S>) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      source,
      visibility: VisibilityTracker::new(),
      sprites: HashMap::new(),
      in_flight: HashMap::new(),
      next_ticket: 0,
      tx,
      rx,
    }
  }

  pub fn mark_visible(&mut self, id: &str) {
    if self.visibility.mark_visible(id) {
      self.request_if_visible(id);
    }
  }

  pub fn mark_hidden(&mut self, id: &str) {
    if self.visibility.mark_hidden(id) {
      self.forget_pending(id);
    }
  }

  pub fn is_visible(&self, id: &str) -> bool {
    self.visibility.is_visible(id)
  }

  /// Sync with the rows currently drawn.
  pub fn update_viewport<'a>(&mut self, rows: impl IntoIterator<Item = &'a str>) {
    let change = self.visibility.diff(rows);
    for id in &change.disappeared {
      self.mark_hidden(id);
    }
    for id in &change.appeared {
      self.mark_visible(id);
    }
  }

  /// Request a sprite regardless of visibility (detail view).
  pub fn request(&mut self, id: &str) {
    if matches!(
      self.sprites.get(id),
      Some(SpriteState::Loading | SpriteState::Ready(_))
    ) {
      return;
    }

    self.next_ticket += 1;
    let ticket = self.next_ticket;
    let source = Arc::clone(&self.source);
    let tx = self.tx.clone();
    let sprite_id = id.to_string();

    debug!(id, "requesting sprite");
    let handle = tokio::spawn(async move {
      let result = source.fetch_sprite(&sprite_id).await;
      let _ = tx.send(SpriteFetched {
        id: sprite_id,
        ticket,
        result,
      });
    });

    self.sprites.insert(id.to_string(), SpriteState::Loading);
    self.in_flight.insert(id.to_string(), InFlight { ticket, handle });
  }

  pub fn state(&self, id: &str) -> Option<&SpriteState> {
    self.sprites.get(id)
  }

  /// Apply finished fetches. Returns `true` if any sprite changed state.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(fetched) = self.rx.try_recv() {
      changed |= self.apply(fetched);
    }
    changed
  }

  fn request_if_visible(&mut self, id: &str) {
    if self.is_visible(id) {
      self.request(id);
    }
  }

  /// Abort an in-flight fetch and drop anything short of a loaded image.
  fn forget_pending(&mut self, id: &str) {
    if let Some(pending) = self.in_flight.remove(id) {
      pending.handle.abort();
    }
    if !matches!(self.sprites.get(id), Some(SpriteState::Ready(_))) {
      self.sprites.remove(id);
    }
  }

  fn apply(&mut self, fetched: SpriteFetched) -> bool {
    let current = self
      .in_flight
      .get(&fetched.id)
      .is_some_and(|pending| pending.ticket == fetched.ticket);
    if !current {
      return false;
    }
    self.in_flight.remove(&fetched.id);

    let state = match fetched.result {
      Ok(bytes) => {
        debug!(id = %fetched.id, bytes = bytes.len(), "sprite loaded");
        SpriteState::Ready(bytes.into())
      }
      Err(e) => {
        warn!(id = %fetched.id, error = %e, "sprite fetch failed");
        SpriteState::Failed(e)
      }
    };
    self.sprites.insert(fetched.id, state);
    true
  }
}
