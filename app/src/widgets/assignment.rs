//! Per-row assignee selector.

use crate::action::TodoAction;
use crate::directory::AssignableUser;
use crate::types::UserId;

/// Label of the leading option shown when nobody is assigned
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// One entry of a rendered selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Value handed back on selection; empty for the placeholder
    pub value: String,
    /// Text shown to the user
    pub label: String,
    /// Whether this option is the current one
    pub selected: bool,
}

/// Assignee selector for the todo at `index`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignmentWidget {
    index: usize,
    current: Option<UserId>,
}

impl AssignmentWidget {
    /// Selector for the todo at `index`, currently assigned to `current`
    #[must_use]
    pub const fn new(index: usize, current: Option<UserId>) -> Self {
        Self { index, current }
    }

    /// Position of the todo this selector edits
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Options for `users`, led by the unassigned placeholder
    #[must_use]
    pub fn options(&self, users: &[AssignableUser]) -> Vec<SelectOption> {
        let placeholder = SelectOption {
            value: String::new(),
            label: UNASSIGNED_LABEL.to_string(),
            selected: self.current.is_none(),
        };

        std::iter::once(placeholder)
            .chain(users.iter().map(|user| SelectOption {
                value: user.id.to_string(),
                label: user.name.clone(),
                selected: self.current == Some(user.id),
            }))
            .collect()
    }

    /// Label for the current assignee
    ///
    /// Falls back to the bare id when `users` does not know the assignee,
    /// e.g. before the directory has loaded.
    #[must_use]
    pub fn current_label(&self, users: &[AssignableUser]) -> String {
        match self.current {
            None => UNASSIGNED_LABEL.to_string(),
            Some(id) => users
                .iter()
                .find(|user| user.id == id)
                .map_or_else(|| format!("user #{id}"), |user| user.name.clone()),
        }
    }

    /// Handle a selection change
    ///
    /// `value` is the string form carried by the selector and is normalized to
    /// a [`UserId`]. The placeholder and unparsable values emit nothing.
    #[must_use]
    pub fn on_select(&self, value: &str) -> Option<TodoAction> {
        if value.trim().is_empty() {
            return None;
        }

        match value.parse::<UserId>() {
            Ok(user_id) => Some(TodoAction::Assign {
                index: self.index,
                user_id,
            }),
            Err(error) => {
                tracing::warn!(index = self.index, %error, "Ignoring assignment selection");
                None
            },
        }
    }
}
