//! Single source of truth for what the main pane shows.

use crate::blog::types::ArticleId;
use tracing::debug;

/// What the user is doing: reading (with an optional selection) or writing.
///
/// Selecting and creating are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
  Browsing {
    selected: Option<ArticleId>,
  },
  Creating,
}

impl Default for ViewMode {
  fn default() -> Self {
    ViewMode::Browsing { selected: None }
  }
}

/// Owns selection and create-mode state. Pure, synchronous, no I/O.
#[derive(Debug, Default)]
pub struct Coordinator {
  mode: ViewMode,
}

impl Coordinator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Currently selected article; always `None` while creating
  pub fn selected(&self) -> Option<&ArticleId> {
    match &self.mode {
      ViewMode::Browsing { selected } => selected.as_ref(),
      ViewMode::Creating => None,
    }
  }

  pub fn is_creating(&self) -> bool {
    matches!(self.mode, ViewMode::Creating)
  }

  /// Select an article, leaving create mode if active.
  pub fn select_article(&mut self, id: ArticleId) {
    debug!(%id, "select article");
    self.mode = ViewMode::Browsing { selected: Some(id) };
  }

  /// Enter create mode, clearing the selection.
  pub fn begin_create(&mut self) {
    debug!("begin create");
    self.mode = ViewMode::Creating;
  }

  /// Leave create mode after a successful write with nothing selected,
  /// so the refreshed list picks the first article.
  pub fn on_create_success(&mut self) {
    self.mode = ViewMode::Browsing { selected: None };
  }

  /// Leave create mode without writing. Nothing is selected afterwards,
  /// so the list picks its first article again.
  pub fn cancel_create(&mut self) {
    if self.is_creating() {
      debug!("cancel create");
      self.mode = ViewMode::Browsing { selected: None };
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn id(s: &str) -> ArticleId {
    ArticleId::from(s)
  }

  #[test]
  fn test_starts_browsing_with_nothing_selected() {
    let c = Coordinator::new();
    assert_eq!(c.selected(), None);
    assert!(!c.is_creating());
  }

  #[test]
  fn test_select_exits_create_mode() {
    let mut c = Coordinator::new();
    c.begin_create();
    c.select_article(id("2"));
    assert!(!c.is_creating());
    assert_eq!(c.selected(), Some(&id("2")));
  }

  #[test]
  fn test_begin_create_clears_selection() {
    let mut c = Coordinator::new();
    c.select_article(id("1"));
    c.begin_create();
    assert!(c.is_creating());
    assert_eq!(c.selected(), None);
  }

  #[test]
  fn test_create_success_returns_to_empty_selection() {
    let mut c = Coordinator::new();
    c.select_article(id("1"));
    c.begin_create();
    c.on_create_success();
    assert!(!c.is_creating());
    assert_eq!(c.selected(), None);
  }

  #[test]
  fn test_cancel_leaves_nothing_selected() {
    let mut c = Coordinator::new();
    c.select_article(id("1"));
    c.begin_create();
    c.cancel_create();
    assert_eq!(c.mode, ViewMode::Browsing { selected: None });
  }

  #[test]
  fn test_cancel_outside_create_mode_changes_nothing() {
    let mut c = Coordinator::new();
    c.select_article(id("1"));
    c.cancel_create();
    assert_eq!(c.selected(), Some(&id("1")));
  }

  #[test]
  fn test_begin_create_twice_then_cancel() {
    let mut c = Coordinator::new();
    c.select_article(id("1"));
    c.begin_create();
    c.begin_create();
    assert_eq!(c.mode, ViewMode::Creating);
    c.cancel_create();
    assert_eq!(c.selected(), None);
    assert!(!c.is_creating());
  }

  #[test]
  fn test_mutual_exclusion_over_call_sequences() {
    // Every sequence of up to 6 select/begin calls
    for mask in 0u32..(1 << 6) {
      for len in 0..=6 {
        let mut c = Coordinator::new();
        for step in 0..len {
          if mask & (1 << step) == 0 {
            c.select_article(id(&step.to_string()));
            assert!(!c.is_creating());
            assert_eq!(c.selected(), Some(&id(&step.to_string())));
          } else {
            c.begin_create();
            assert!(c.is_creating());
            assert_eq!(c.selected(), None);
          }
        }
      }
    }
  }
}
