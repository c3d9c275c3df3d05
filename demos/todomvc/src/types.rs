//! Domain types for the TodoMVC state.
//!
//! Two flat records (a todo and the app state), the visibility filter and the
//! three actions the UI can dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a todo
///
/// Allocated by whoever dispatches [`TodoAction::AddTodo`], see
/// [`TodoApp::add_todo`](crate::TodoApp::add_todo).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Wrap a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single todo
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier
    pub id: TodoId,
    /// What needs doing
    pub text: String,
    /// Whether it is done
    pub completed: bool,
}

impl Todo {
    /// A new, not yet completed todo
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Copy of this todo with `completed` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Error type for [`VisibilityFilter`] parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown visibility filter `{0}` (expected all, active or completed)")]
pub struct ParseFilterError(String);

/// Which todos the list shows
///
/// Serialises as `"SHOW_ALL"`, `"SHOW_ACTIVE"` and `"SHOW_COMPLETED"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityFilter {
    /// Every todo
    #[default]
    ShowAll,
    /// Todos not yet completed
    ShowActive,
    /// Completed todos
    ShowCompleted,
}

impl VisibilityFilter {
    /// Every filter, in footer order
    pub const ALL: [Self; 3] = [Self::ShowAll, Self::ShowActive, Self::ShowCompleted];

    /// Wire name, e.g. `SHOW_ACTIVE`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowAll => "SHOW_ALL",
            Self::ShowActive => "SHOW_ACTIVE",
            Self::ShowCompleted => "SHOW_COMPLETED",
        }
    }

    /// Label of the footer link selecting this filter
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShowAll => "All",
            Self::ShowActive => "Active",
            Self::ShowCompleted => "Completed",
        }
    }

    /// Whether a todo passes this filter
    #[must_use]
    pub const fn admits(self, todo: &Todo) -> bool {
        match self {
            Self::ShowActive => !todo.completed,
            Self::ShowCompleted => todo.completed,
            Self::ShowAll => true,
        }
    }
}

impl fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityFilter {
    type Err = ParseFilterError;

    /// Accepts the wire names and the short forms `all`, `active`,
    /// `completed`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHOW_ALL" | "ALL" => Ok(Self::ShowAll),
            "SHOW_ACTIVE" | "ACTIVE" => Ok(Self::ShowActive),
            "SHOW_COMPLETED" | "COMPLETED" => Ok(Self::ShowCompleted),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// The whole application state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Todos in insertion order
    pub todos: Vec<Todo>,
    /// Current list filter
    pub visibility_filter: VisibilityFilter,
}

impl AppState {
    /// Empty list showing `filter`
    #[must_use]
    pub const fn with_filter(filter: VisibilityFilter) -> Self {
        Self {
            todos: Vec::new(),
            visibility_filter: filter,
        }
    }

    /// First todo with the given id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }
}

/// Everything the UI can ask the state to do
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TodoAction {
    /// Append a new todo
    AddTodo {
        /// Id of the new todo
        id: TodoId,
        /// Its text
        text: String,
    },
    /// Flip the completed flag of a todo
    ToggleTodo {
        /// Todo to flip
        id: TodoId,
    },
    /// Change the list filter
    SetVisibilityFilter {
        /// New filter
        filter: VisibilityFilter,
    },
}
