use crate::error::BlogError;
use std::sync::Arc;

/// Coarse state of a cache entry as seen by a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
  /// Nothing fetched yet and nothing in flight
  Idle,
  /// First fetch in flight, no data to show
  Loading,
  /// Data available (possibly being refreshed in the background)
  Success,
  /// Last attempt failed and nothing is in flight
  Error,
}

/// Point-in-time view of a cache entry.
///
/// Data is shared, so taking a snapshot is cheap and the reader never sees
/// an entry halfway through an update.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<V> {
  pub(super) data: Option<Arc<V>>,
  pub(super) error: Option<BlogError>,
  pub(super) is_fetching: bool,
  pub(super) version: u64,
}

impl<V> QuerySnapshot<V> {
  pub(super) fn empty() -> Self {
    Self {
      data: None,
      error: None,
      is_fetching: false,
      version: 0,
    }
  }

  pub fn status(&self) -> QueryStatus {
    if self.is_fetching && self.data.is_none() {
      QueryStatus::Loading
    } else if self.error.is_some() && !self.is_fetching {
      QueryStatus::Error
    } else if self.data.is_some() {
      QueryStatus::Success
    } else {
      QueryStatus::Idle
    }
  }

  /// Last successfully fetched data, kept across refetches and later errors
  pub fn data(&self) -> Option<&V> {
    self.data.as_deref()
  }

  #[cfg(test)]
  pub fn is_loading(&self) -> bool {
    self.status() == QueryStatus::Loading
  }

  #[cfg(test)]
  pub fn is_error(&self) -> bool {
    self.status() == QueryStatus::Error
  }

  #[cfg(test)]
  pub fn is_success(&self) -> bool {
    self.status() == QueryStatus::Success
  }

  /// A fetch is in flight, whether or not data is already shown
  pub fn is_fetching(&self) -> bool {
    self.is_fetching
  }

  pub fn error(&self) -> Option<&BlogError> {
    self.error.as_ref()
  }

  /// Incremented on every successful fetch; 0 until the first one lands
  pub fn version(&self) -> u64 {
    self.version
  }
}
