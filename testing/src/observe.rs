//! Drive a store and observe what it publishes.
//!
//! Every helper takes an explicit timeout so a missing publication fails the
//! test instead of hanging it.

use futures::{Stream, StreamExt};
use reactive_todo_core::reducer::Reducer;
use reactive_todo_runtime::{Store, StoreError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Errors from observing a store in tests
#[derive(Error, Debug)]
pub enum ObserveError {
    /// Nothing arrived before the deadline
    #[error("timed out after receiving {received} values")]
    TimedOut {
        /// Values received before the deadline
        received: usize,
    },
    /// The store went away before enough values arrived
    #[error("closed after receiving {received} values")]
    Closed {
        /// Values received before the end
        received: usize,
    },
    /// The store rejected an action
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Take the first `count` items of a state stream
///
/// # Errors
///
/// [`ObserveError::TimedOut`] if `timeout` elapses first,
/// [`ObserveError::Closed`] if the stream ends first.
pub async fn collect_states<S, St>(
    stream: St,
    count: usize,
    timeout: Duration,
) -> Result<Vec<S>, ObserveError>
where
    St: Stream<Item = S>,
{
    let mut stream = std::pin::pin!(stream);
    let mut seen = Vec::with_capacity(count);

    let collected = tokio::time::timeout(timeout, async {
        while seen.len() < count {
            match stream.next().await {
                Some(state) => seen.push(state),
                None => return false,
            }
        }
        true
    })
    .await;

    match collected {
        Ok(true) => Ok(seen),
        Ok(false) => Err(ObserveError::Closed {
            received: seen.len(),
        }),
        Err(_) => Err(ObserveError::TimedOut {
            received: seen.len(),
        }),
    }
}

/// Wait for the next state published to a state receiver
///
/// # Errors
///
/// [`ObserveError::TimedOut`] if nothing is published within `timeout`,
/// [`ObserveError::Closed`] if the store is gone.
pub async fn next_state<S: Clone>(
    receiver: &mut watch::Receiver<S>,
    timeout: Duration,
) -> Result<S, ObserveError> {
    let changed = tokio::time::timeout(timeout, receiver.changed()).await;
    match changed {
        Ok(Ok(())) => Ok((*receiver.borrow_and_update()).clone()),
        Ok(Err(_)) => Err(ObserveError::Closed { received: 0 }),
        Err(_) => Err(ObserveError::TimedOut { received: 0 }),
    }
}

/// Send actions to a store one after another
///
/// # Errors
///
/// Stops at and returns the first [`StoreError`].
pub async fn send_all<S, A, E, R>(
    store: &Store<S, A, E, R>,
    actions: impl IntoIterator<Item = A>,
) -> Result<(), StoreError>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    for action in actions {
        store.send(action).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_states_takes_prefix() -> Result<(), ObserveError> {
        let stream = futures::stream::iter([1, 2, 3, 4]);
        let seen = collect_states(stream, 3, Duration::from_secs(1)).await?;
        assert_eq!(seen, vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn test_collect_states_reports_closed_stream() {
        let stream = futures::stream::iter([1]);
        let result = collect_states(stream, 2, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ObserveError::Closed { received: 1 })));
    }

    #[tokio::test]
    async fn test_collect_states_times_out() {
        let stream = async_stream::stream! {
            yield 1;
            futures::future::pending::<()>().await;
        };
        let result = collect_states(stream, 2, Duration::from_millis(20)).await;
        assert!(matches!(result, Err(ObserveError::TimedOut { received: 1 })));
    }

    #[tokio::test]
    async fn test_next_state_sees_update() -> Result<(), ObserveError> {
        let (tx, mut rx) = watch::channel(0);
        tx.send_replace(9);
        assert_eq!(next_state(&mut rx, Duration::from_secs(1)).await?, 9);
        Ok(())
    }
}
