use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal resized; redraw
  Resize,
  /// Periodic tick for applying finished fetches
  Tick,
}

/// Turns terminal input and a tick timer into a single event stream
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm polling blocks, so it gets its own thread
    tokio::task::spawn_blocking(move || loop {
      let event = if event::poll(tick_rate).unwrap_or(false) {
        match event::read() {
          Ok(raw) => match translate(raw) {
            Some(event) => event,
            None => continue,
          },
          Err(_) => continue,
        }
      } else {
        Event::Tick
      };
      if tx.send(event).is_err() {
        break;
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

/// Keep key presses (not releases or repeats reported by some terminals)
/// and resizes; drop everything else.
fn translate(event: CrosstermEvent) -> Option<Event> {
  match event {
    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
    CrosstermEvent::Resize(..) => Some(Event::Resize),
    _ => None,
  }
}
