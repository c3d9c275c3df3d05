//! Reducers for the TodoMVC state.
//!
//! Each slice of [`AppState`] has its own reducer: [`TodosReducer`] folds the
//! todo list, [`FilterReducer`] folds the visibility filter. [`AppReducer`]
//! scopes both onto their fields and combines them, so one action produces one
//! complete `AppState`. Neither reducer can fail: actions meant for the other
//! slice leave a slice untouched.

use crate::types::{AppState, Todo, TodoAction, VisibilityFilter};
use reactive_todo_core::{
    composition::{combine_reducers, scope_reducer, CombinedReducer},
    effect::Effect,
    environment::{IdGenerator, SequentialIdGenerator},
    reducer::Reducer,
    smallvec, SmallVec,
};
use std::sync::Arc;

/// Environment dependencies for the TodoMVC reducers
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for new todos
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

impl Default for TodoEnvironment {
    /// Ids counting up from zero
    fn default() -> Self {
        Self::new(Arc::new(SequentialIdGenerator::new()))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Folds actions into the todo list
#[derive(Clone, Debug, Default)]
pub struct TodosReducer;

impl TodosReducer {
    /// Creates a new `TodosReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodosReducer {
    type State = Vec<Todo>;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        todos: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::AddTodo { id, text } => {
                tracing::debug!(%id, "Adding todo");
                todos.push(Todo::new(id, text));
            },
            TodoAction::ToggleTodo { id } => {
                let mut toggled = 0_usize;
                for todo in todos.iter_mut().filter(|t| t.id == id) {
                    *todo = todo.toggled();
                    toggled += 1;
                }
                if toggled == 0 {
                    tracing::debug!(%id, "Toggle for unknown todo ignored");
                } else {
                    tracing::debug!(%id, toggled, "Toggled todo");
                }
            },
            TodoAction::SetVisibilityFilter { .. } => {},
        }

        smallvec![Effect::None]
    }
}

/// Folds actions into the visibility filter
#[derive(Clone, Debug, Default)]
pub struct FilterReducer;

impl FilterReducer {
    /// Creates a new `FilterReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for FilterReducer {
    type State = VisibilityFilter;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let TodoAction::SetVisibilityFilter { filter } = action {
            tracing::debug!(from = %state, to = %filter, "Changing visibility filter");
            *state = filter;
        }

        smallvec![Effect::None]
    }
}

/// The app reducer: both slice reducers combined over [`AppState`]
///
/// # Example
///
/// ```
/// use reactive_todo_core::reducer::Reducer;
/// use todomvc::{AppReducer, AppState, TodoAction, TodoEnvironment, TodoId, VisibilityFilter};
///
/// let reducer = AppReducer::new();
/// let env = TodoEnvironment::default();
/// let mut state = AppState::default();
///
/// let _ = reducer.reduce(&mut state, TodoAction::AddTodo { id: TodoId::new(0), text: "milk".into() }, &env);
/// let _ = reducer.reduce(&mut state, TodoAction::SetVisibilityFilter { filter: VisibilityFilter::ShowActive }, &env);
///
/// assert_eq!(state.todos.len(), 1);
/// assert_eq!(state.visibility_filter, VisibilityFilter::ShowActive);
/// ```
#[derive(Clone)]
pub struct AppReducer {
    inner: CombinedReducer<AppState, TodoAction, TodoEnvironment>,
}

impl AppReducer {
    /// Creates the combined reducer
    #[must_use]
    pub fn new() -> Self {
        let inner = combine_reducers(vec![
            Arc::new(scope_reducer(
                TodosReducer::new(),
                |s: &AppState| &s.todos,
                |s: &mut AppState, todos| s.todos = todos,
            )),
            Arc::new(scope_reducer(
                FilterReducer::new(),
                |s: &AppState| &s.visibility_filter,
                |s: &mut AppState, filter| s.visibility_filter = filter,
            )),
        ]);

        Self { inner }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppReducer")
            .field("reducers", &self.inner.len())
            .finish()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(?action, "Reducing");
        self.inner.reduce(state, action, env)
    }
}
