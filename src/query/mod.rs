//! Keyed async query cache and one-shot mutations.
//!
//! Inspired by TanStack Query: a [`QueryClient`] owns one entry per key,
//! runs at most one fetch per key at a time, keeps the last good data
//! around while refetching, and refetches on invalidation when someone is
//! still looking at the key. A [`Mutation`] wraps a single write whose
//! outcome the caller reacts to once.
//!
//! Everything here is driven from the UI event loop: fetches run as tokio
//! tasks and report back over a channel, and results are applied in
//! `poll()`, so entries only change between two loop iterations.
//!
//! # Example
//!
//! ```ignore
//! let mut client = QueryClient::new(fetcher, QueryOptions::default());
//! client.subscribe(&key);
//!
//! // In event loop tick
//! if client.poll() {
//!     // Some entry changed, re-render
//! }
//!
//! // In render
//! let snapshot = client.peek(&key);
//! match snapshot.status() {
//!     QueryStatus::Loading => render_spinner(),
//!     QueryStatus::Success => render_data(snapshot.data()),
//!     QueryStatus::Error => render_error(snapshot.error()),
//!     QueryStatus::Idle => {}
//! }
//! ```

mod client;
mod mutation;
mod state;

pub use client::{QueryClient, QueryOptions};
pub use mutation::{Mutation, MutationState};
pub use state::QueryStatus;

use crate::error::BlogError;
use std::future::Future;
use std::pin::Pin;

/// A boxed future resolving to a fetch or write result
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, BlogError>> + Send>>;
