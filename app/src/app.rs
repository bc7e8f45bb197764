//! Root of the application.
//!
//! [`TodoApp`] owns the todo store and injects it into the widgets: the input
//! widget and the list view turn UI events into update requests, and the app
//! sends those to the store. Nothing but the store holds the list; widgets
//! only ever see a snapshot.

use crate::action::{DecodeError, TodoAction};
use crate::directory::UserDirectory;
use crate::reducer::TodoReducer;
use crate::types::TodoList;
use crate::widgets::{InputWidget, Key, ListFrame, ListView};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use todoboard_runtime::{Store, StoreError};

/// Store holding the authoritative todo list
pub type TodoStore = Store<TodoReducer>;

/// A discrete UI event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Key press in the input widget
    Key(Key),
    /// The input widget's text was replaced
    DraftChanged(String),
    /// Checkbox click on a row
    Toggle(usize),
    /// Assignee selection on a row, with the selector's string value
    Assign {
        /// Row index
        index: usize,
        /// Selected value
        value: String,
    },
    /// Remove button on a row
    Remove(usize),
    /// Bulk toggle of every row
    ToggleAll,
    /// A raw JSON update request
    Raw(String),
}

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The store rejected the request
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A raw update request could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A full rendered screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// The list
    pub list: ListFrame,
    /// The input widget's draft
    pub draft: String,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.list)?;
        write!(f, "> {}", self.draft)
    }
}

/// The todo application
#[derive(Debug)]
pub struct TodoApp {
    store: TodoStore,
    input: InputWidget,
    list_view: ListView,
}

impl TodoApp {
    /// Creates an app with an empty list
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self::with_todos(TodoList::new(), directory)
    }

    /// Creates an app starting from `todos`
    #[must_use]
    pub fn with_todos(todos: TodoList, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            store: Store::new(todos, TodoReducer::new(), ()),
            input: InputWidget::new(),
            list_view: ListView::new(directory),
        }
    }

    /// Mount the widget tree, starting the directory fetch
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the directory store is shutting down.
    pub async fn mount(&mut self) -> Result<(), AppError> {
        self.list_view.mount().await?;
        Ok(())
    }

    /// Unmount the widget tree, cancelling a directory fetch still in flight
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the directory store is shutting down.
    pub async fn unmount(&mut self) -> Result<(), AppError> {
        self.list_view.unmount().await?;
        Ok(())
    }

    /// Route a UI event to its widget and send the resulting request, if any
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Decode`] for a malformed raw request and
    /// [`AppError::Store`] if the store is shutting down.
    pub async fn handle(&mut self, event: UiEvent) -> Result<(), AppError> {
        let action = match event {
            UiEvent::Key(key) => self.input.on_key(key),
            UiEvent::DraftChanged(text) => {
                self.input.on_change_draft(text);
                None
            },
            UiEvent::Toggle(index) => Some(self.list_view.on_toggle(index)),
            UiEvent::Assign { index, value } => {
                let todos = self.todos().await;
                self.list_view.on_assign(&todos, index, &value)
            },
            UiEvent::Remove(index) => Some(self.list_view.on_remove(index)),
            UiEvent::ToggleAll => {
                let todos = self.todos().await;
                self.list_view.on_toggle_all(&todos)
            },
            UiEvent::Raw(json) => Some(TodoAction::decode(&json)?),
        };

        if let Some(action) = action {
            self.dispatch(action).await?;
        }

        Ok(())
    }

    /// Send an update request to the store
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the store is shutting down.
    pub async fn dispatch(&self, action: TodoAction) -> Result<(), AppError> {
        if !action.is_request() {
            tracing::warn!("Unrecognized update request, list left unchanged");
        }
        self.store.send(action).await?;
        Ok(())
    }

    /// Current list snapshot
    pub async fn todos(&self) -> TodoList {
        self.store.snapshot().await
    }

    /// The input widget
    #[must_use]
    pub const fn input(&self) -> &InputWidget {
        &self.input
    }

    /// The list view
    #[must_use]
    pub const fn list_view(&self) -> &ListView {
        &self.list_view
    }

    /// The todo store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Render the whole screen from the current snapshot
    pub async fn render(&self) -> Frame {
        let todos = self.todos().await;
        Frame {
            list: self.list_view.render(&todos).await,
            draft: self.input.draft().to_string(),
        }
    }
}
