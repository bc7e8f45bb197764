//! Reducer for the todo list store.
//!
//! Every request is a pure transformation of the current snapshot. The store
//! only ever swaps in the next [`TodoList`]; previous snapshots are never
//! written to.

use crate::action::TodoAction;
use crate::types::TodoList;
use todoboard_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the list that follows `list` after `action`
    ///
    /// Returns a snapshot sharing `list`'s allocation when the request does
    /// not change anything (out-of-range index, unrecognized tag).
    #[must_use]
    pub fn next(list: &TodoList, action: TodoAction) -> TodoList {
        match action {
            TodoAction::Add { todo } => list.add(todo),
            TodoAction::Toggle { index } => list.toggle_at(index),
            TodoAction::Assign { index, user_id } => list.assign_at(index, user_id),
            TodoAction::Remove { index } => list.remove_at(index),
            TodoAction::ReplaceAll { list: next } => list.replace_all(&next),
            TodoAction::Unrecognized => list.clone(),
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoList;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let tag = action.tag();
        let index = action.index();
        let next = Self::next(state, action);

        if next.ptr_eq(state) {
            tracing::debug!(tag, ?index, len = state.len(), "Update request left list unchanged");
        } else {
            tracing::debug!(tag, ?index, len = next.len(), "Applied update request");
            *state = next;
        }

        SmallVec::new()
    }
}
