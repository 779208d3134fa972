use crate::error::BlogError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::state::QuerySnapshot;
use super::BoxFuture;

/// A factory that creates the fetch future for a key
type FetcherFn<K, V> = Arc<dyn Fn(K) -> BoxFuture<V> + Send + Sync>;

/// Tuning knobs for a [`QueryClient`]
#[derive(Debug, Clone)]
pub struct QueryOptions {
  /// Age after which data is refetched when a new observer subscribes
  pub stale_time: Duration,
  /// Extra attempts after a retryable failure
  pub retry: u32,
  /// Delay before the first retry; grows linearly with each attempt
  pub retry_delay: Duration,
}

impl Default for QueryOptions {
  fn default() -> Self {
    Self {
      stale_time: Duration::from_secs(60),
      retry: 1,
      retry_delay: Duration::from_millis(500),
    }
  }
}

/// A finished fetch on its way back to the event loop
struct Completion<K, V> {
  key: K,
  generation: u64,
  result: Result<V, BlogError>,
}

#[derive(Debug)]
struct Entry<V> {
  data: Option<Arc<V>>,
  error: Option<BlogError>,
  /// Generation of the fetch whose result will be accepted
  in_flight: Option<u64>,
  version: u64,
  fetched_at: Option<Instant>,
  invalidated: bool,
  observers: usize,
}

impl<V> Default for Entry<V> {
  fn default() -> Self {
    Self {
      data: None,
      error: None,
      in_flight: None,
      version: 0,
      fetched_at: None,
      invalidated: false,
      observers: 0,
    }
  }
}

impl<V> Entry<V> {
  fn snapshot(&self) -> QuerySnapshot<V> {
    QuerySnapshot {
      data: self.data.clone(),
      error: self.error.clone(),
      is_fetching: self.in_flight.is_some(),
      version: self.version,
    }
  }

  fn is_stale(&self, stale_time: Duration) -> bool {
    self.invalidated
      || self
        .fetched_at
        .map(|t| t.elapsed() > stale_time)
        .unwrap_or(true)
  }
}

/// Process-wide keyed cache of fetches.
///
/// QueryClient guarantees:
/// - at most one fetch in flight per key, shared by every reader
/// - readers see the last resolved data or a loading/error state
/// - a failure on one key never touches another key's entry
/// - invalidated keys refetch right away if anyone is subscribed
pub struct QueryClient<K, V> {
  entries: HashMap<K, Entry<V>>,
  fetcher: FetcherFn<K, V>,
  options: QueryOptions,
  tx: mpsc::UnboundedSender<Completion<K, V>>,
  rx: mpsc::UnboundedReceiver<Completion<K, V>>,
  next_generation: u64,
}

impl<K, V> QueryClient<K, V>
where
  K: Clone + Eq + Hash + Debug + Send + 'static,
  V: Send + 'static,
{
  /// Create a client with the given fetcher.
  ///
  /// The fetcher is called with the key each time an entry needs data.
  pub fn new<F, Fut>(fetcher: F, options: QueryOptions) -> Self
  where
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, BlogError>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      entries: HashMap::new(),
      fetcher: Arc::new(move |key| Box::pin(fetcher(key))),
      options,
      tx,
      rx,
      next_generation: 0,
    }
  }

  /// Read an entry, fetching if the key has never loaded or was invalidated.
  ///
  /// A key whose last attempt failed is not retried here; subscribing,
  /// invalidating or an explicit refetch does that.
  pub fn read(&mut self, key: &K) -> QuerySnapshot<V> {
    let entry = self.entries.entry(key.clone()).or_default();
    let never_loaded = entry.data.is_none() && entry.error.is_none();
    let needs_fetch = entry.in_flight.is_none() && (never_loaded || entry.invalidated);
    if needs_fetch {
      self.start_fetch(key);
    }
    self.peek(key)
  }

  /// Read an entry without side effects.
  pub fn peek(&self, key: &K) -> QuerySnapshot<V> {
    self
      .entries
      .get(key)
      .map(Entry::snapshot)
      .unwrap_or_else(QuerySnapshot::empty)
  }

  /// Register an active reader for a key.
  ///
  /// Fetches when the entry has no data, is stale, or last failed, unless
  /// a fetch is already in flight.
  pub fn subscribe(&mut self, key: &K) {
    let stale_time = self.options.stale_time;
    let entry = self.entries.entry(key.clone()).or_default();
    entry.observers += 1;

    let needs_fetch = entry.in_flight.is_none()
      && (entry.data.is_none() || entry.error.is_some() || entry.is_stale(stale_time));
    if needs_fetch {
      self.start_fetch(key);
    }
  }

  /// Drop an active reader. Cached data stays for later subscribers.
  pub fn unsubscribe(&mut self, key: &K) {
    if let Some(entry) = self.entries.get_mut(key) {
      entry.observers = entry.observers.saturating_sub(1);
    }
  }

  #[cfg(test)]
  pub fn observers(&self, key: &K) -> usize {
    self.entries.get(key).map(|e| e.observers).unwrap_or(0)
  }

  /// Mark an entry stale, refetching now if the key has active readers.
  ///
  /// A fetch already in flight is always superseded so the next result
  /// reflects everything that happened before this call; otherwise the
  /// refetch waits for the next read or subscribe.
  pub fn invalidate(&mut self, key: &K) {
    let Some(entry) = self.entries.get_mut(key) else {
      return;
    };
    entry.invalidated = true;

    if entry.observers > 0 || entry.in_flight.is_some() {
      debug!(?key, "invalidated, refetching");
      self.start_fetch(key);
    } else {
      debug!(?key, "invalidated, no observers");
    }
  }

  /// Force a fetch for a key, superseding any in flight.
  pub fn refetch(&mut self, key: &K) {
    self.entries.entry(key.clone()).or_default();
    self.start_fetch(key);
  }

  /// Apply every fetch that has completed since the last call.
  ///
  /// Returns `true` if any entry changed. Call this in the event loop tick.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(completion) = self.rx.try_recv() {
      changed |= self.apply(completion);
    }
    changed
  }

  /// Wait for the next fetch to complete and apply it.
  ///
  /// Returns `true` if it changed an entry (superseded results do not).
  #[cfg(test)]
  pub async fn recv(&mut self) -> bool {
    match self.rx.recv().await {
      Some(completion) => self.apply(completion),
      None => false,
    }
  }

  fn apply(&mut self, completion: Completion<K, V>) -> bool {
    let Completion {
      key,
      generation,
      result,
    } = completion;

    let Some(entry) = self.entries.get_mut(&key) else {
      return false;
    };
    if entry.in_flight != Some(generation) {
      debug!(?key, generation, "dropping superseded result");
      return false;
    }
    entry.in_flight = None;

    match result {
      Ok(data) => {
        entry.data = Some(Arc::new(data));
        entry.error = None;
        entry.version += 1;
        entry.fetched_at = Some(Instant::now());
        entry.invalidated = false;
        debug!(?key, version = entry.version, "fetch succeeded");
      }
      Err(e) => {
        warn!(?key, error = %e, "fetch failed");
        entry.error = Some(e);
      }
    }
    true
  }

  fn start_fetch(&mut self, key: &K) {
    self.next_generation += 1;
    let generation = self.next_generation;
    if let Some(entry) = self.entries.get_mut(key) {
      entry.in_flight = Some(generation);
    }
    debug!(?key, generation, "starting fetch");

    let fetcher = Arc::clone(&self.fetcher);
    let tx = self.tx.clone();
    let key = key.clone();
    let retry = self.options.retry;
    let retry_delay = self.options.retry_delay;
    let mut pending = fetcher(key.clone());

    tokio::spawn(async move {
      let mut attempt = 0;
      let result = loop {
        match pending.await {
          Err(e) if e.is_retryable() && attempt < retry => {
            attempt += 1;
            warn!(?key, attempt, error = %e, "fetch failed, retrying");
            tokio::time::sleep(retry_delay * attempt).await;
            pending = fetcher(key.clone());
          }
          other => break other,
        }
      };
      // Ignore send errors - the client may have been dropped
      let _ = tx.send(Completion {
        key,
        generation,
        result,
      });
    });
  }
}

impl<K: Debug, V> std::fmt::Debug for QueryClient<K, V> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueryClient")
      .field("keys", &self.entries.keys().collect::<Vec<_>>())
      .field("options", &self.options)
      .finish_non_exhaustive()
  }
}
