//! End-to-end tests for the TodoMVC app: dispatch through the store and
//! observe what subscribers see.

use futures::StreamExt;
use reactive_todo_testing::{ScriptedIdGenerator, collect_states, init_test_tracing, next_state};
use std::sync::Arc;
use std::time::Duration;
use todomvc::{
    AppState, Todo, TodoAction, TodoApp, TodoConfig, TodoEnvironment, TodoId, VisibilityFilter,
};

const WAIT: Duration = Duration::from_secs(1);

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn app() -> TodoApp {
    init_test_tracing();
    TodoApp::new(&TodoConfig::default())
}

#[tokio::test]
async fn subscriber_sees_initial_state_before_any_action() {
    let app = app();
    let state = (*app.subscribe().borrow()).clone();
    assert_eq!(state, AppState::default());
}

#[tokio::test]
async fn late_subscriber_gets_latest_state() -> TestResult {
    let app = app();
    let milk = app.add_todo("Buy milk").await?;
    app.toggle(milk).await?;
    app.set_filter(VisibilityFilter::ShowCompleted).await?;

    let late = app.subscribe();
    let state = (*late.borrow()).clone();

    assert_eq!(state.todos, vec![Todo::new(milk, "Buy milk").toggled()]);
    assert_eq!(state.visibility_filter, VisibilityFilter::ShowCompleted);

    let replayed = collect_states(app.states(), 1, WAIT).await?;
    assert_eq!(replayed, vec![state]);
    Ok(())
}

#[tokio::test]
async fn every_action_publishes_exactly_one_state() -> TestResult {
    let app = app();
    let mut states = app.subscribe();

    let milk = app.add_todo("Buy milk").await?;
    let after_add = next_state(&mut states, WAIT).await?;
    assert_eq!(after_add.todos.len(), 1);
    assert!(!states.has_changed()?);

    // Unknown id leaves the state alone but still publishes
    app.toggle(TodoId::new(42)).await?;
    let after_unknown = next_state(&mut states, WAIT).await?;
    assert_eq!(after_unknown, after_add);
    assert!(!states.has_changed()?);

    app.toggle(milk).await?;
    let after_toggle = next_state(&mut states, WAIT).await?;
    assert!(after_toggle.todos[0].completed);

    app.set_filter(VisibilityFilter::ShowActive).await?;
    let after_filter = next_state(&mut states, WAIT).await?;
    assert_eq!(after_filter.todos, after_toggle.todos);
    assert_eq!(after_filter.visibility_filter, VisibilityFilter::ShowActive);
    Ok(())
}

#[tokio::test]
async fn state_stream_combines_both_slices() -> TestResult {
    let app = app();
    let mut stream = Box::pin(app.states());

    let initial = stream.next().await;
    assert_eq!(initial, Some(AppState::default()));

    let milk = app.add_todo("Buy milk").await?;
    let state = stream.next().await.ok_or("stream ended")?;
    assert_eq!(state.todos, vec![Todo::new(milk, "Buy milk")]);
    assert_eq!(state.visibility_filter, VisibilityFilter::ShowAll);

    app.set_filter(VisibilityFilter::ShowCompleted).await?;
    let state = stream.next().await.ok_or("stream ended")?;
    assert_eq!(state.todos, vec![Todo::new(milk, "Buy milk")]);
    assert_eq!(state.visibility_filter, VisibilityFilter::ShowCompleted);
    Ok(())
}

#[tokio::test]
async fn visible_todos_stream_tracks_filter_and_toggles() -> TestResult {
    let app = app();
    let milk = app.add_todo("Buy milk").await?;
    app.add_todo("Walk dog").await?;

    let mut visible = Box::pin(app.visible_todos_stream());
    let texts = |todos: Vec<Todo>| todos.into_iter().map(|t| t.text).collect::<Vec<_>>();

    assert_eq!(
        visible.next().await.map(texts),
        Some(vec!["Buy milk".to_string(), "Walk dog".to_string()])
    );

    app.set_filter(VisibilityFilter::ShowActive).await?;
    assert_eq!(
        visible.next().await.map(texts),
        Some(vec!["Buy milk".to_string(), "Walk dog".to_string()])
    );

    app.toggle(milk).await?;
    assert_eq!(
        visible.next().await.map(texts),
        Some(vec!["Walk dog".to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn filter_selected_stream_follows_filter_changes() -> TestResult {
    let app = app();
    let mut completed = Box::pin(app.filter_selected_stream(VisibilityFilter::ShowCompleted));

    assert_eq!(completed.next().await, Some(false));

    app.set_filter(VisibilityFilter::ShowCompleted).await?;
    assert_eq!(completed.next().await, Some(true));

    app.set_filter(VisibilityFilter::ShowAll).await?;
    assert_eq!(completed.next().await, Some(false));
    Ok(())
}

#[tokio::test]
async fn duplicate_ids_are_kept_and_toggled_together() -> TestResult {
    init_test_tracing();
    let env = TodoEnvironment::new(Arc::new(ScriptedIdGenerator::new([7, 7])));
    let app = TodoApp::with_environment(&TodoConfig::default(), env);

    let first = app.add_todo("first").await?;
    let second = app.add_todo("second").await?;
    assert_eq!(first, second);

    app.toggle(first).await?;

    let state = app.snapshot().await;
    assert_eq!(state.todos.len(), 2);
    assert!(state.todos.iter().all(|t| t.completed));
    Ok(())
}

#[tokio::test]
async fn action_subscribers_see_dispatch_order() -> TestResult {
    let app = app();
    let mut actions = app.actions();

    let milk = app.add_todo("Buy milk").await?;
    app.toggle(milk).await?;
    app.set_filter(VisibilityFilter::ShowActive).await?;

    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(tokio::time::timeout(WAIT, actions.recv()).await??);
    }

    assert_eq!(
        seen,
        vec![
            TodoAction::AddTodo {
                id: milk,
                text: "Buy milk".to_string(),
            },
            TodoAction::ToggleTodo { id: milk },
            TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowActive,
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn snapshot_serialises_with_wire_names() -> TestResult {
    let app = app();
    let milk = app.add_todo("Buy milk").await?;
    app.toggle(milk).await?;
    app.set_filter(VisibilityFilter::ShowCompleted).await?;

    let json = serde_json::to_value(app.snapshot().await)?;
    assert_eq!(
        json,
        serde_json::json!({
            "todos": [{ "id": 0, "text": "Buy milk", "completed": true }],
            "visibility_filter": "SHOW_COMPLETED",
        })
    );
    Ok(())
}

#[tokio::test]
async fn shutdown_keeps_last_state_observable() -> TestResult {
    let app = app();
    app.add_todo("Buy milk").await?;
    let subscriber = app.subscribe();

    app.shutdown().await?;

    assert!(app.set_filter(VisibilityFilter::ShowActive).await.is_err());
    assert_eq!(subscriber.borrow().todos.len(), 1);
    assert_eq!(subscriber.borrow().visibility_filter, VisibilityFilter::ShowAll);
    Ok(())
}
