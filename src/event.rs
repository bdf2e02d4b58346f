use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

/// How long the input thread blocks before checking whether the app is gone
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal resized; the viewport changed
  Resize,
  /// Periodic tick for UI refresh and fetch polling
  Tick,
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    spawn_ticker(tx.clone(), tick_rate);

    // crossterm polling blocks, keep it off the runtime workers
    tokio::task::spawn_blocking(move || {
      while !tx.is_closed() {
        match event::poll(INPUT_POLL) {
          Ok(true) => {}
          Ok(false) => continue,
          Err(e) => {
            warn!(error = %e, "terminal input failed");
            break;
          }
        }

        let event = match event::read() {
          // Windows reports both press and release
          Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
          Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
          _ => continue,
        };

        if tx.send(event).is_err() {
          break;
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

/// Ticks on a fixed schedule, independent of how busy the keyboard is.
fn spawn_ticker(tx: mpsc::UnboundedSender<Event>, tick_rate: Duration) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(tick_rate);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
      interval.tick().await;
      if tx.send(Event::Tick).is_err() {
        break;
      }
    }
  })
}
