//! Catalog state owned by the UI task.
//!
//! `CatalogStore` decides between the cached snapshot and a network fetch,
//! holds the current list, selection and detail, and publishes every state
//! transition to subscribers.
//!
//! Fetches run as spawned tasks. Their results come back over a channel and
//! are applied only in [`CatalogStore::poll`], so every mutation and every
//! notification happens on the task that owns the store.
//!
//! # Example
//!
//! ```ignore
//! let mut store = CatalogStore::new(client, cache, options);
//! let mut events = store.subscribe();
//!
//! store.load_catalog();
//!
//! // In event loop tick
//! if store.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::client::CatalogSource;
use super::error::CatalogError;
use super::filter::filter;
use super::types::{EntityDetail, EntityList, EntitySummary};
use crate::cache::{is_fresh, EntityCache};

/// Lifecycle of the entity list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
  /// Nothing requested yet
  Uninitialized,
  /// Cache lookup or network fetch in progress
  Loading,
  /// A snapshot is available
  Ready,
  /// The last fetch failed; any earlier snapshot is still held
  Failed(CatalogError),
}

/// Where an adopted snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
  Cache,
  Network,
}

/// State transitions, delivered to subscribers in commit order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
  ListLoading,
  ListReady {
    entries: usize,
    source: SnapshotSource,
  },
  ListFailed(CatalogError),
  Selected(EntitySummary),
  DetailLoaded(EntityDetail),
  DetailFailed {
    entity: EntitySummary,
    error: CatalogError,
  },
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
  /// Page size for the single bulk list request
  pub page_limit: u32,
  /// How long a snapshot stays valid
  pub cache_ttl: Duration,
}

impl Default for StoreOptions {
  fn default() -> Self {
    Self {
      page_limit: 1300,
      cache_ttl: Duration::days(30),
    }
  }
}

/// Result of a spawned fetch, applied on the owning task
enum Completion {
  List(Result<EntityList, CatalogError>),
  Detail {
    generation: u64,
    result: Result<EntityDetail, CatalogError>,
  },
}

pub struct CatalogStore<C: CatalogSource> {
  source: Arc<C>,
  cache: EntityCache,
  options: StoreOptions,

  status: ListStatus,
  snapshot: EntityList,
  /// Write time of the snapshot currently held
  stored_at: Option<DateTime<Utc>>,

  selected: Option<EntitySummary>,
  detail: Option<EntityDetail>,
  detail_error: Option<CatalogError>,
  /// Bumped on every detail request; completions carrying an older value are dropped
  generation: u64,

  tx: mpsc::UnboundedSender<Completion>,
  rx: mpsc::UnboundedReceiver<Completion>,
  subscribers: Vec<mpsc::UnboundedSender<StoreEvent>>,
}

impl<C: CatalogSource> CatalogStore<C> {
  pub fn new(source: Arc<C>, cache: EntityCache, options: StoreOptions) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      source,
      cache,
      options,
      status: ListStatus::Uninitialized,
      snapshot: EntityList::default(),
      stored_at: None,
      selected: None,
      detail: None,
      detail_error: None,
      generation: 0,
      tx,
      rx,
      subscribers: Vec::new(),
    }
  }

  /// Receive every state transition from now on.
  pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StoreEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    self.subscribers.push(tx);
    rx
  }

  // ==========================================================================
  // List
  // ==========================================================================

  /// Make sure a valid snapshot is loaded.
  ///
  /// Safe to call on every view activation: a no-op while loading or while
  /// the held snapshot is still valid. Otherwise a valid cache entry is
  /// adopted, and only when there is none is the list fetched.
  pub fn load_catalog(&mut self) {
    match self.status {
      ListStatus::Loading => {
        debug!("list load already in flight, skipping");
        return;
      }
      ListStatus::Ready if self.snapshot_is_fresh() => return,
      _ => {}
    }

    self.set_status(ListStatus::Loading, StoreEvent::ListLoading);

    if let Some(entry) = self.cache.load() {
      if entry.is_valid(self.options.cache_ttl) {
        info!(
          entries = entry.snapshot.len(),
          stored_at = %entry.stored_at,
          "using cached catalog"
        );
        self.adopt(entry.snapshot, entry.stored_at, SnapshotSource::Cache);
        return;
      }
      debug!(age_days = entry.age().num_days(), "cached catalog expired");
    }

    self.spawn_list_fetch();
  }

  /// Fetch the list from the network regardless of the cache.
  pub fn refresh(&mut self) {
    if self.status == ListStatus::Loading {
      debug!("list load already in flight, skipping refresh");
      return;
    }
    self.set_status(ListStatus::Loading, StoreEvent::ListLoading);
    self.spawn_list_fetch();
  }

  fn spawn_list_fetch(&self) {
    let source = Arc::clone(&self.source);
    let tx = self.tx.clone();
    let page_limit = self.options.page_limit;

    tokio::spawn(async move {
      let result = source.fetch_list(page_limit).await;
      // Ignore send errors - the store may have been dropped
      let _ = tx.send(Completion::List(result));
    });
  }

  fn snapshot_is_fresh(&self) -> bool {
    self
      .stored_at
      .is_some_and(|at| is_fresh(at, self.options.cache_ttl))
  }

  fn adopt(&mut self, snapshot: EntityList, stored_at: DateTime<Utc>, source: SnapshotSource) {
    let entries = snapshot.len();
    self.snapshot = snapshot;
    self.stored_at = Some(stored_at);
    self.set_status(ListStatus::Ready, StoreEvent::ListReady { entries, source });
  }

  fn apply_list(&mut self, result: Result<EntityList, CatalogError>) {
    match result {
      Ok(list) => {
        info!(entries = list.len(), "fetched catalog");
        self.cache.save(&list);
        self.adopt(list, Utc::now(), SnapshotSource::Network);
      }
      Err(e) => {
        warn!(error = %e, "catalog fetch failed");
        self.set_status(ListStatus::Failed(e.clone()), StoreEvent::ListFailed(e));
      }
    }
  }

  // ==========================================================================
  // Selection and detail
  // ==========================================================================

  /// Select an entity and load its detail. Any earlier detail request is
  /// superseded.
  pub fn select(&mut self, entity: EntitySummary) {
    self.selected = Some(entity.clone());
    self.publish(StoreEvent::Selected(entity.clone()));
    self.request_detail(entity);
  }

  /// Re-request detail for the current selection.
  pub fn retry_detail(&mut self) {
    if let Some(entity) = self.selected.clone() {
      self.request_detail(entity);
    }
  }

  fn request_detail(&mut self, entity: EntitySummary) {
    self.detail = None;
    self.detail_error = None;
    self.generation += 1;

    let generation = self.generation;
    let source = Arc::clone(&self.source);
    let tx = self.tx.clone();

    debug!(name = %entity.name, generation, "requesting detail");
    tokio::spawn(async move {
      let result = source.fetch_detail(&entity.source_url).await;
      let _ = tx.send(Completion::Detail { generation, result });
    });
  }

  fn apply_detail(&mut self, generation: u64, result: Result<EntityDetail, CatalogError>) -> bool {
    if generation != self.generation {
      debug!(generation, current = self.generation, "discarding stale detail");
      return false;
    }
    let Some(entity) = self.selected.clone() else {
      return false;
    };

    match result {
      Ok(detail) => {
        self.detail = Some(detail.clone());
        self.publish(StoreEvent::DetailLoaded(detail));
      }
      Err(error) => {
        warn!(name = %entity.name, error = %error, "detail fetch failed");
        self.detail_error = Some(error.clone());
        self.publish(StoreEvent::DetailFailed { entity, error });
      }
    }
    true
  }

  // ==========================================================================
  // Completion handling
  // ==========================================================================

  /// Apply finished fetches without blocking.
  ///
  /// Returns `true` if any state changed. Call this in the event loop tick.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(completion) = self.rx.try_recv() {
      changed |= self.apply(completion);
    }
    changed
  }

  /// Wait for the next finished fetch and apply it.
  #[cfg(test)]
  pub async fn next_update(&mut self) -> bool {
    match self.rx.recv().await {
      Some(completion) => self.apply(completion),
      None => false,
    }
  }

  fn apply(&mut self, completion: Completion) -> bool {
    match completion {
      Completion::List(result) => {
        self.apply_list(result);
        true
      }
      Completion::Detail { generation, result } => self.apply_detail(generation, result),
    }
  }

  fn set_status(&mut self, status: ListStatus, event: StoreEvent) {
    self.status = status;
    self.publish(event);
  }

  fn publish(&mut self, event: StoreEvent) {
    self
      .subscribers
      .retain(|subscriber| subscriber.send(event.clone()).is_ok());
  }

  // ==========================================================================
  // Accessors for rendering
  // ==========================================================================

  pub fn status(&self) -> &ListStatus {
    &self.status
  }

  pub fn snapshot(&self) -> &EntityList {
    &self.snapshot
  }

  pub fn stored_at(&self) -> Option<DateTime<Utc>> {
    self.stored_at
  }

  /// Snapshot entries matching `query`, in snapshot order
  pub fn filtered(&self, query: &str) -> Vec<&EntitySummary> {
    filter(&self.snapshot, query)
  }

  pub fn selected(&self) -> Option<&EntitySummary> {
    self.selected.as_ref()
  }

  pub fn detail(&self) -> Option<&EntityDetail> {
    self.detail.as_ref()
  }

  pub fn detail_error(&self) -> Option<&CatalogError> {
    self.detail_error.as_ref()
  }

  pub fn is_detail_loading(&self) -> bool {
    self.selected.is_some() && self.detail.is_none() && self.detail_error.is_none()
  }
}
