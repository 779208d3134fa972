use crate::error::BlogError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::BoxFuture;

/// The state of a mutation
#[derive(Debug, Clone)]
pub enum MutationState<T> {
  /// Mutation has not been started
  Idle,
  /// Write in flight
  Pending,
  /// Write completed successfully
  Success(T),
  /// Write failed
  Error(BlogError),
}

impl<T> MutationState<T> {
  pub fn is_pending(&self) -> bool {
    matches!(self, MutationState::Pending)
  }

  #[cfg(test)]
  pub fn data(&self) -> Option<&T> {
    match self {
      MutationState::Success(data) => Some(data),
      _ => None,
    }
  }

  #[cfg(test)]
  pub fn error(&self) -> Option<&BlogError> {
    match self {
      MutationState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A factory function that creates futures for a write
type MutatorFn<I, T> = Arc<dyn Fn(I) -> BoxFuture<T> + Send + Sync>;

/// Async write with state management.
///
/// Unlike cached queries, a mutation runs only when asked, never more than
/// once at a time, and its result is not shared with anyone else.
pub struct Mutation<I, T> {
  state: MutationState<T>,
  mutator: MutatorFn<I, T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, BlogError>>>,
}

impl<I: Send + 'static, T: Send + 'static> Mutation<I, T> {
  /// Create a new mutation with the given write function.
  ///
  /// # Example
  ///
  /// ```ignore
  /// let gateway = gateway.clone();
  /// let mutation = Mutation::new(move |article: NewArticle| {
  ///     let gateway = gateway.clone();
  ///     async move { gateway.create_article(&article).await }
  /// });
  /// ```
  pub fn new<F, Fut>(mutator: F) -> Self
  where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, BlogError>> + Send + 'static,
  {
    Self {
      state: MutationState::Idle,
      mutator: Arc::new(move |input| Box::pin(mutator(input))),
      receiver: None,
    }
  }

  /// Get the current state of the mutation.
  pub fn state(&self) -> &MutationState<T> {
    &self.state
  }

  pub fn is_pending(&self) -> bool {
    self.state.is_pending()
  }

  /// Start the write.
  ///
  /// Returns `false` without doing anything if a write is already pending.
  pub fn mutate(&mut self, input: I) -> bool {
    if self.state.is_pending() {
      return false;
    }

    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = MutationState::Pending;

    let future = (self.mutator)(input);
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
    true
  }

  /// Poll for the result of a pending write.
  ///
  /// Returns `true` exactly once per write, when it settles.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    // Try to receive without blocking
    match receiver.try_recv() {
      Ok(result) => {
        self.settle(result);
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - treat as error
        self.settle(Err(BlogError::network("request was cancelled")));
        true
      }
    }
  }

  /// Wait for a pending write to settle.
  #[cfg(test)]
  pub async fn recv(&mut self) -> bool {
    let Some(receiver) = &mut self.receiver else {
      return false;
    };
    let result = receiver
      .recv()
      .await
      .unwrap_or_else(|| Err(BlogError::network("request was cancelled")));
    self.settle(result);
    true
  }

  fn settle(&mut self, result: Result<T, BlogError>) {
    self.receiver = None;
    self.state = match result {
      Ok(data) => MutationState::Success(data),
      Err(e) => MutationState::Error(e),
    };
  }
}

impl<I, T: std::fmt::Debug> std::fmt::Debug for Mutation<I, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Mutation")
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn test_mutation_success() {
    let mut mutation = Mutation::new(|n: i32| async move { Ok(n * 2) });

    assert!(matches!(mutation.state(), MutationState::Idle));
    assert!(mutation.mutate(21));
    assert!(mutation.is_pending());

    // Wait for the result
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(mutation.poll());
    assert_eq!(mutation.state().data(), Some(&42));
    // Settles only once
    assert!(!mutation.poll());
  }

  #[tokio::test]
  async fn test_mutation_error() {
    let mut mutation: Mutation<(), i32> =
      Mutation::new(|_| async { Err(BlogError::network("Something went wrong")) });

    mutation.mutate(());
    assert!(mutation.recv().await);
    assert_eq!(
      mutation.state().error(),
      Some(&BlogError::network("Something went wrong"))
    );
  }

  #[tokio::test]
  async fn test_mutate_while_pending_is_noop() {
    let mut mutation = Mutation::new(|n: i32| async move {
      tokio::time::sleep(Duration::from_millis(50)).await;
      Ok(n)
    });

    assert!(mutation.mutate(1));
    assert!(!mutation.mutate(2));

    mutation.recv().await;
    assert_eq!(mutation.state().data(), Some(&1));
  }

  #[tokio::test]
  async fn test_can_resubmit_after_error() {
    let attempts = Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter = attempts.clone();
    let mut mutation = Mutation::new(move |_: ()| {
      let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
      async move {
        if n == 0 {
          Err(BlogError::network("offline"))
        } else {
          Ok(n)
        }
      }
    });

    mutation.mutate(());
    mutation.recv().await;
    assert!(mutation.state().error().is_some());

    assert!(mutation.mutate(()));
    mutation.recv().await;
    assert_eq!(mutation.state().data(), Some(&1));
  }
}
