use crate::blog::queries::BlogQueryClient;
use crate::coordinator::Coordinator;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Outcome of offering a key to a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
  /// Key consumed
  Handled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Shared state a view may change in response to input or new data
pub struct ViewContext<'a> {
  pub queries: &'a mut BlogQueryClient,
  pub coordinator: &'a mut Coordinator,
}

/// Trait for view behavior
///
/// Views never own cached data. They subscribe to query keys, read the
/// cache when rendering, and change selection through the coordinator.
/// The App calls `sync` after every event so views can follow coordinator
/// changes and run their effects before the next draw.
pub trait View {
  /// Handle a key event
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext) -> ViewAction;

  /// Render the view to the frame. Rendering has no side effects.
  fn render(&mut self, frame: &mut Frame, area: Rect, queries: &BlogQueryClient, coordinator: &Coordinator);

  /// Follow coordinator changes and react to settled fetches
  fn sync(&mut self, _ctx: &mut ViewContext) {}

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    Vec::new()
  }
}
