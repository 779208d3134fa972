//! Error taxonomy for talking to the blog API and validating drafts.
//!
//! Application-level failures (config, terminal setup) use
//! `color_eyre::Result` instead; this type is what the query cache stores
//! and what the views render.

use crate::blog::types::ArticleId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlogError {
  /// Transport failure, unexpected status, or a body we could not decode
  #[error("network error: {message}")]
  Network { message: String },

  /// The requested article does not exist on the server
  #[error("article {id} not found")]
  NotFound { id: ArticleId },

  /// A required creation field was left empty
  #[error("{field} is required")]
  Validation { field: &'static str },
}

impl BlogError {
  pub fn network(message: impl Into<String>) -> Self {
    Self::Network {
      message: message.into(),
    }
  }

  /// Whether another attempt could plausibly succeed.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::Network { .. })
  }
}

impl From<reqwest::Error> for BlogError {
  fn from(e: reqwest::Error) -> Self {
    Self::network(e.to_string())
  }
}
