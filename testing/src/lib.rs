//! # Reactive Todo Testing
//!
//! Testing utilities and helpers for reducer-driven reactive state.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Helpers for observing a store's state stream in async tests
//!
//! ## Example
//!
//! ```ignore
//! use reactive_todo_testing::{collect_states, send_all};
//!
//! #[tokio::test]
//! async fn test_todo_flow() {
//!     let store = Store::new(AppState::default(), AppReducer::new(), env);
//!     let states = store.state_stream();
//!
//!     send_all(&store, [TodoAction::AddTodo { id, text }]).await?;
//!
//!     let seen = collect_states(states, 2, Duration::from_secs(1)).await?;
//!     assert_eq!(seen[1].todos.len(), 1);
//! }
//! ```


/// Async helpers for driving and observing a store
pub mod observe;

/// Deterministic implementations of environment traits.
pub mod mocks {
    use reactive_todo_core::environment::IdGenerator;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Id generator that hands out a fixed script of ids first
    ///
    /// Once the script is exhausted it counts up from one past the largest
    /// scripted id. Useful for reproducing collisions such as two todos with
    /// the same id.
    ///
    /// # Example
    ///
    /// ```
    /// use reactive_todo_testing::mocks::ScriptedIdGenerator;
    /// use reactive_todo_core::environment::IdGenerator;
    ///
    /// let ids = ScriptedIdGenerator::new([5, 5]);
    /// assert_eq!(ids.next_id(), 5);
    /// assert_eq!(ids.next_id(), 5);
    /// assert_eq!(ids.next_id(), 6);
    /// ```
    #[derive(Debug)]
    pub struct ScriptedIdGenerator {
        script: Mutex<VecDeque<u64>>,
        fallback: AtomicU64,
    }

    impl ScriptedIdGenerator {
        /// Create a generator replaying `script` in order
        #[must_use]
        pub fn new(script: impl IntoIterator<Item = u64>) -> Self {
            let script: VecDeque<u64> = script.into_iter().collect();
            let fallback = script.iter().max().map_or(0, |max| max + 1);
            Self {
                script: Mutex::new(script),
                fallback: AtomicU64::new(fallback),
            }
        }
    }

    impl IdGenerator for ScriptedIdGenerator {
        fn next_id(&self) -> u64 {
            let scripted = match self.script.lock() {
                Ok(mut script) => script.pop_front(),
                // A panicking test already failed, keep counting
                Err(poisoned) => poisoned.into_inner().pop_front(),
            };
            scripted.unwrap_or_else(|| self.fallback.fetch_add(1, Ordering::Relaxed))
        }
    }
}

/// Install a `tracing` subscriber for test output
///
/// Honours `RUST_LOG`, writes through the test harness' captured writer and
/// is safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::ScriptedIdGenerator;
pub use observe::{collect_states, next_state, send_all, ObserveError};
pub use reducer_test::{assertions, ReducerTest};
