//! Text input that creates todos.

use super::Key;
use crate::action::TodoAction;
use crate::types::Todo;

/// Input widget owning the in-progress title
///
/// The draft lives here and nowhere else; the container only ever sees the
/// finished [`Todo`] emitted on confirmation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputWidget {
    draft: String,
}

impl InputWidget {
    /// Creates an input with an empty draft
    #[must_use]
    pub const fn new() -> Self {
        Self {
            draft: String::new(),
        }
    }

    /// The in-progress title
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft
    pub fn on_change_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Handle a key press
    ///
    /// `Enter` confirms; characters and `Backspace` edit the draft; every
    /// other key is ignored.
    pub fn on_key(&mut self, key: Key) -> Option<TodoAction> {
        match key {
            Key::Enter => self.on_confirm(),
            Key::Char(c) => {
                self.draft.push(c);
                None
            },
            Key::Backspace => {
                self.draft.pop();
                None
            },
            Key::Escape | Key::Tab | Key::Up | Key::Down => None,
        }
    }

    /// Confirm the draft
    ///
    /// Emits an `ADD` with the trimmed title and clears the draft. A blank
    /// draft emits nothing and is left as typed.
    pub fn on_confirm(&mut self) -> Option<TodoAction> {
        let title = self.draft.trim();
        if title.is_empty() {
            tracing::debug!("Ignoring confirm of blank draft");
            return None;
        }

        let todo = Todo::new(title);
        self.draft.clear();
        Some(TodoAction::Add { todo })
    }
}
