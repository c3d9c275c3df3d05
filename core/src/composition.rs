//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on a slice of a larger state
//!
//! Together they express the usual "one reducer per state slice" layout: each
//! slice reducer is scoped onto its field and the scoped reducers are combined,
//! so a single action produces a single, fully updated parent state.
//!
//! # Example
//!
//! ```
//! use reactive_todo_core::composition::{combine_reducers, scope_reducer};
//! use reactive_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug)]
//! enum Action {
//!     Push(u32),
//!     Rename(String),
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     items: Vec<u32>,
//!     name: String,
//! }
//!
//! struct ItemsReducer;
//! struct NameReducer;
//!
//! impl Reducer for ItemsReducer {
//!     type State = Vec<u32>;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Vec<u32>, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::Push(n) = action {
//!             state.push(n);
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! impl Reducer for NameReducer {
//!     type State = String;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut String, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::Rename(name) = action {
//!             *state = name;
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let app = combine_reducers(vec![
//!     Arc::new(scope_reducer(ItemsReducer, |s: &AppState| &s.items, |s: &mut AppState, v| s.items = v)),
//!     Arc::new(scope_reducer(NameReducer, |s: &AppState| &s.name, |s: &mut AppState, v| s.name = v)),
//! ]);
//!
//! let mut state = AppState::default();
//! let _ = app.reduce(&mut state, Action::Push(7), &());
//! let _ = app.reduce(&mut state, Action::Rename("list".to_string()), &());
//! assert_eq!(state.items, vec![7]);
//! assert_eq!(state.name, "list");
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// A shareable, type-erased reducer
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in order against the same state, and all effects are
/// collected and concatenated.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The environment type
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`]. Cloning is cheap: the inner reducers are
/// shared.
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers combined
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Clone for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// This allows you to reuse reducers designed for smaller state types
/// within a larger application state.
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `SubS`: The child state type (subset of `S`)
/// - `A`: The action type
/// - `E`: The environment type
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<fn() -> (A, E)>,
}

impl<S, SubS, A, E, R> Clone for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            get_state: self.get_state,
            set_state: self.set_state,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // Work on a copy of the slice, then write it back
        let mut sub_state = (self.get_state)(state).clone();
        let effects = self.reducer.reduce(&mut sub_state, action, env);
        (self.set_state)(state, sub_state);

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Add(i32),
        Multiply(i32),
        SetName(String),
    }

    #[derive(Clone, Debug, Default)]
    struct ParentState {
        value: i32,
        name: String,
    }

    #[derive(Clone)]
    struct ValueReducer;

    impl Reducer for ValueReducer {
        type State = i32;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Add(n) => *state += n,
                TestAction::Multiply(n) => *state *= n,
                TestAction::SetName(_) => {},
            }
            smallvec![Effect::None]
        }
    }

    #[derive(Clone)]
    struct NameReducer;

    impl Reducer for NameReducer {
        type State = String;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if let TestAction::SetName(name) = action {
                *state = name;
            }
            smallvec![Effect::None]
        }
    }

    fn app_reducer() -> CombinedReducer<ParentState, TestAction, ()> {
        combine_reducers(vec![
            Arc::new(scope_reducer(
                ValueReducer,
                |s: &ParentState| &s.value,
                |s: &mut ParentState, v| s.value = v,
            )),
            Arc::new(scope_reducer(
                NameReducer,
                |s: &ParentState| &s.name,
                |s: &mut ParentState, v| s.name = v,
            )),
        ])
    }

    #[test]
    fn test_scope_reducer_leaves_other_fields() {
        let scoped = scope_reducer(
            ValueReducer,
            |s: &ParentState| &s.value,
            |s: &mut ParentState, v| s.value = v,
        );

        let mut state = ParentState {
            value: 5,
            name: "test".to_string(),
        };

        let _ = scoped.reduce(&mut state, TestAction::Add(3), &());
        assert_eq!(state.value, 8);
        assert_eq!(state.name, "test");

        let _ = scoped.reduce(&mut state, TestAction::Multiply(2), &());
        assert_eq!(state.value, 16);
        assert_eq!(state.name, "test");
    }

    #[test]
    fn test_combine_reducers_collects_every_effect() {
        let combined = app_reducer();
        assert_eq!(combined.len(), 2);

        let mut state = ParentState::default();
        let effects = combined.reduce(&mut state, TestAction::Add(1), &());
        assert_eq!(effects.len(), 2);
        assert!(effects.iter().all(Effect::is_noop));
    }

    #[test]
    fn test_combined_clone_shares_behaviour() {
        let combined = app_reducer();
        let cloned = combined.clone();

        let mut a = ParentState::default();
        let mut b = ParentState::default();
        let _ = combined.reduce(&mut a, TestAction::SetName("x".to_string()), &());
        let _ = cloned.reduce(&mut b, TestAction::SetName("x".to_string()), &());
        assert_eq!(a.name, b.name);
    }

    proptest! {
        #[test]
        fn combined_matches_independent_folds(adds in proptest::collection::vec(-100_i32..100, 0..32), name in "[a-z]{0,8}") {
            let combined = app_reducer();
            let mut state = ParentState::default();
            let mut value = 0_i32;

            for n in &adds {
                let _ = combined.reduce(&mut state, TestAction::Add(*n), &());
                value += n;
            }
            let _ = combined.reduce(&mut state, TestAction::SetName(name.clone()), &());

            prop_assert_eq!(state.value, value);
            prop_assert_eq!(state.name, name);
        }
    }
}
