//! TodoMVC state core built on the reactive todo runtime.
//!
//! The UI dispatches three actions: add a todo, toggle a todo and change the
//! visibility filter. Two reducers fold them into the todo list and the
//! filter, the store combines both slices into one [`AppState`] per action and
//! replays the latest state to every subscriber, late ones included.
//!
//! # Quick Start
//!
//! ```no_run
//! use todomvc::{TodoApp, TodoConfig, VisibilityFilter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = TodoApp::new(&TodoConfig::default());
//!
//! let milk = app.add_todo("Buy milk").await?;
//! app.add_todo("Walk dog").await?;
//! app.toggle(milk).await?;
//! app.set_filter(VisibilityFilter::ShowActive).await?;
//!
//! for todo in app.visible_todos().await {
//!     println!("{} {}", todo.id, todo.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod reducer;
pub mod selectors;
pub mod types;

pub use app::{TodoApp, TodoStore};
pub use command::{Command, CommandError};
pub use config::{ConfigError, TodoConfig};
pub use reducer::{AppReducer, FilterReducer, TodoEnvironment, TodosReducer};
pub use selectors::{
    active_count, completed_count, filter_links, is_filter_selected, visible_todos, FilterLink,
};
pub use types::{AppState, ParseFilterError, Todo, TodoAction, TodoId, VisibilityFilter};
