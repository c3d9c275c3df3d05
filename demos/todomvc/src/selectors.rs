//! Pure views derived from [`AppState`].

use crate::types::{AppState, Todo, VisibilityFilter};

/// One footer link as rendered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterLink {
    /// Filter the link selects
    pub filter: VisibilityFilter,
    /// Link text
    pub label: &'static str,
    /// Whether it is the current filter
    pub selected: bool,
}

/// Footer links in display order, the current filter marked selected
#[must_use]
pub fn filter_links(state: &AppState) -> Vec<FilterLink> {
    VisibilityFilter::ALL
        .into_iter()
        .map(|filter| FilterLink {
            filter,
            label: filter.label(),
            selected: is_filter_selected(state, filter),
        })
        .collect()
}

/// Todos shown under `filter`, in list order
#[must_use]
pub fn visible_todos(todos: &[Todo], filter: VisibilityFilter) -> Vec<Todo> {
    todos.iter().filter(|t| filter.admits(t)).cloned().collect()
}

/// Whether the footer link for `filter` is the selected one
#[must_use]
pub fn is_filter_selected(state: &AppState, filter: VisibilityFilter) -> bool {
    state.visibility_filter == filter
}

/// Number of todos still to do
#[must_use]
pub fn active_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|t| !t.completed).count()
}

/// Number of completed todos
#[must_use]
pub fn completed_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|t| t.completed).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use proptest::prelude::*;

    fn sample() -> Vec<Todo> {
        vec![
            Todo::new(TodoId::new(0), "a"),
            Todo::new(TodoId::new(1), "b").toggled(),
            Todo::new(TodoId::new(2), "c"),
        ]
    }

    #[test]
    fn active_keeps_incomplete() {
        let ids: Vec<u64> = visible_todos(&sample(), VisibilityFilter::ShowActive)
            .iter()
            .map(|t| t.id.get())
            .collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn completed_keeps_done() {
        let visible = visible_todos(&sample(), VisibilityFilter::ShowCompleted);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].text, "b");
    }

    #[test]
    fn all_keeps_everything() {
        assert_eq!(visible_todos(&sample(), VisibilityFilter::ShowAll), sample());
    }

    #[test]
    fn links_in_footer_order_with_one_selected() {
        let links = filter_links(&AppState::with_filter(VisibilityFilter::ShowActive));

        let labels: Vec<&str> = links.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["All", "Active", "Completed"]);

        let selected: Vec<VisibilityFilter> =
            links.iter().filter(|l| l.selected).map(|l| l.filter).collect();
        assert_eq!(selected, vec![VisibilityFilter::ShowActive]);
    }

    fn arb_todos() -> impl Strategy<Value = Vec<Todo>> {
        proptest::collection::vec((0_u64..50, "[a-z]{1,6}", any::<bool>()), 0..24).prop_map(|rows| {
            rows.into_iter()
                .map(|(id, text, completed)| Todo {
                    id: TodoId::new(id),
                    text,
                    completed,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn active_and_completed_partition_all(todos in arb_todos()) {
            let active = visible_todos(&todos, VisibilityFilter::ShowActive);
            let completed = visible_todos(&todos, VisibilityFilter::ShowCompleted);

            prop_assert_eq!(active.len() + completed.len(), todos.len());
            prop_assert_eq!(active.len(), active_count(&todos));
            prop_assert_eq!(completed.len(), completed_count(&todos));
            prop_assert!(active.iter().all(|t| !t.completed));
            prop_assert!(completed.iter().all(|t| t.completed));
            prop_assert_eq!(visible_todos(&todos, VisibilityFilter::ShowAll), todos.clone());
        }

        #[test]
        fn filtering_is_pure(todos in arb_todos(), pick in 0_usize..3) {
            let filter = VisibilityFilter::ALL[pick];
            let first = visible_todos(&todos, filter);
            let second = visible_todos(&todos, filter);
            prop_assert_eq!(first, second);
        }
    }
}
