//! The TodoMVC application: a store plus the dispatch and view bindings a UI
//! needs.
//!
//! A front end holds a [`TodoApp`], calls [`add_todo`](TodoApp::add_todo),
//! [`toggle`](TodoApp::toggle) and [`set_filter`](TodoApp::set_filter) on user
//! input, and renders from [`subscribe`](TodoApp::subscribe) or one of the
//! derived streams.

use crate::config::TodoConfig;
use crate::reducer::{AppReducer, TodoEnvironment};
use crate::selectors::{self, FilterLink};
use crate::types::{AppState, Todo, TodoAction, TodoId, VisibilityFilter};
use futures::{Stream, StreamExt};
use reactive_todo_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// The store type backing a [`TodoApp`]
pub type TodoStore = Store<AppState, TodoAction, TodoEnvironment, AppReducer>;

/// Dispatcher and state for a TodoMVC front end
///
/// Clones share the same store.
#[derive(Clone)]
pub struct TodoApp {
    store: TodoStore,
    shutdown_timeout: Duration,
}

impl TodoApp {
    /// Build the app with ids counting up from zero
    #[must_use]
    pub fn new(config: &TodoConfig) -> Self {
        Self::with_environment(config, TodoEnvironment::default())
    }

    /// Build the app with an explicit environment
    #[must_use]
    pub fn with_environment(config: &TodoConfig, environment: TodoEnvironment) -> Self {
        let store = Store::with_config(
            AppState::with_filter(config.initial_filter),
            AppReducer::new(),
            environment,
            config.store_config(),
        );

        tracing::debug!(filter = %config.initial_filter, "TodoMVC store created");

        Self {
            store,
            shutdown_timeout: config.shutdown_timeout,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Dispatch a raw action
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] once the app is shutting down.
    pub async fn dispatch(&self, action: TodoAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Add a todo with a freshly allocated id, returning that id
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] once the app is shutting down.
    pub async fn add_todo(&self, text: impl Into<String>) -> Result<TodoId, StoreError> {
        let id = TodoId::new(self.store.environment().ids.next_id());
        self.dispatch(TodoAction::AddTodo {
            id,
            text: text.into(),
        })
        .await?;
        Ok(id)
    }

    /// Flip the completed flag of a todo
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] once the app is shutting down.
    pub async fn toggle(&self, id: TodoId) -> Result<(), StoreError> {
        self.dispatch(TodoAction::ToggleTodo { id }).await?;
        Ok(())
    }

    /// Change the list filter
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] once the app is shutting down.
    pub async fn set_filter(&self, filter: VisibilityFilter) -> Result<(), StoreError> {
        self.dispatch(TodoAction::SetVisibilityFilter { filter }).await?;
        Ok(())
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> AppState {
        self.store.state(Clone::clone).await
    }

    /// Todos the list currently shows
    pub async fn visible_todos(&self) -> Vec<Todo> {
        self.store
            .state(|s| selectors::visible_todos(&s.todos, s.visibility_filter))
            .await
    }

    /// Footer links with their selection state
    pub async fn filter_links(&self) -> Vec<FilterLink> {
        self.store.state(selectors::filter_links).await
    }

    /// Latest-value state receiver
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.store.subscribe_state()
    }

    /// Every action reduced from now on
    #[must_use]
    pub fn actions(&self) -> broadcast::Receiver<TodoAction> {
        self.store.subscribe_actions()
    }

    /// Every state, starting with the current one
    pub fn states(&self) -> impl Stream<Item = AppState> + Send + 'static {
        self.store.state_stream()
    }

    /// Visible todos, recomputed for every state
    pub fn visible_todos_stream(&self) -> impl Stream<Item = Vec<Todo>> + Send + 'static {
        self.states()
            .map(|s| selectors::visible_todos(&s.todos, s.visibility_filter))
    }

    /// Whether `filter` is selected, for every state
    pub fn filter_selected_stream(
        &self,
        filter: VisibilityFilter,
    ) -> impl Stream<Item = bool> + Send + 'static {
        self.states()
            .map(move |s| selectors::is_filter_selected(&s, filter))
    }

    /// Stop accepting actions and wait for running effects
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] if effects outlive the configured
    /// timeout.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.store.shutdown(self.shutdown_timeout).await
    }
}

impl std::fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApp")
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_todo_allocates_increasing_ids() -> Result<(), StoreError> {
        let app = TodoApp::new(&TodoConfig::default());

        let first = app.add_todo("Buy milk").await?;
        let second = app.add_todo("Walk dog").await?;

        assert_eq!(first, TodoId::new(0));
        assert_eq!(second, TodoId::new(1));

        let state = app.snapshot().await;
        assert_eq!(state.todos.len(), 2);
        assert_eq!(state.get(second).map(|t| t.text.as_str()), Some("Walk dog"));
        Ok(())
    }

    #[tokio::test]
    async fn test_initial_filter_comes_from_config() {
        let config = TodoConfig {
            initial_filter: VisibilityFilter::ShowCompleted,
            ..TodoConfig::default()
        };
        let app = TodoApp::new(&config);

        assert_eq!(app.subscribe().borrow().visibility_filter, VisibilityFilter::ShowCompleted);
    }

    #[tokio::test]
    async fn test_filter_links_mark_current_filter() -> Result<(), StoreError> {
        let app = TodoApp::new(&TodoConfig::default());
        app.set_filter(VisibilityFilter::ShowActive).await?;

        let links = app.filter_links().await;
        let labels: Vec<&str> = links.iter().map(|l| l.label).collect();
        let selected: Vec<bool> = links.iter().map(|l| l.selected).collect();

        assert_eq!(labels, vec!["All", "Active", "Completed"]);
        assert_eq!(selected, vec![false, true, false]);
        Ok(())
    }

    #[tokio::test]
    async fn test_visible_todos_follow_filter() -> Result<(), StoreError> {
        let app = TodoApp::new(&TodoConfig::default());
        let milk = app.add_todo("Buy milk").await?;
        app.add_todo("Walk dog").await?;
        app.toggle(milk).await?;

        app.set_filter(VisibilityFilter::ShowCompleted).await?;
        let texts: Vec<String> = app.visible_todos().await.into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Buy milk".to_string()]);

        app.set_filter(VisibilityFilter::ShowActive).await?;
        let texts: Vec<String> = app.visible_todos().await.into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Walk dog".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_rejects_later_dispatch() -> Result<(), StoreError> {
        let app = TodoApp::new(&TodoConfig::default());
        app.shutdown().await?;

        assert!(matches!(
            app.add_todo("too late").await,
            Err(StoreError::ShutdownInProgress)
        ));
        Ok(())
    }
}
