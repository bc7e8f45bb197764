//! List of todos with per-row toggle and assignment.

use super::{AssignmentWidget, SelectOption};
use crate::action::TodoAction;
use crate::directory::{
    AssignableUser, DirectoryAction, DirectoryEnvironment, DirectoryReducer, DirectoryState,
    UserDirectory,
};
use crate::types::{TodoList, UserId};
use std::fmt;
use std::sync::Arc;
use todoboard_runtime::{Store, StoreError};
use tokio::sync::watch;

/// Store holding the user directory owned by a [`ListView`]
pub type DirectoryStore = Store<DirectoryReducer>;

/// Directory status shown under the list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectoryStatus {
    /// The view has not been mounted
    NotRequested,
    /// The fetch is in flight
    Loading,
    /// The fetch failed
    Failed(String),
    /// The directory answered with no users
    Empty,
    /// Users available for assignment
    Ready(usize),
}

impl From<&DirectoryState> for DirectoryStatus {
    fn from(state: &DirectoryState) -> Self {
        match state {
            DirectoryState::NotRequested => Self::NotRequested,
            DirectoryState::Loading => Self::Loading,
            DirectoryState::Failed(message) => Self::Failed(message.clone()),
            DirectoryState::Loaded(users) if users.is_empty() => Self::Empty,
            DirectoryState::Loaded(users) => Self::Ready(users.len()),
        }
    }
}

impl fmt::Display for DirectoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => write!(f, "users: not requested"),
            Self::Loading => write!(f, "users: loading..."),
            Self::Failed(message) => write!(f, "users: unavailable ({message})"),
            Self::Empty => write!(f, "users: none available"),
            Self::Ready(count) => write!(f, "users: {count} available"),
        }
    }
}

/// One rendered todo
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowFrame {
    /// Position in the list
    pub index: usize,
    /// Checkbox state
    pub is_done: bool,
    /// Title
    pub title: String,
    /// Current assignee
    pub assignee: Option<UserId>,
    /// Label of the current assignee
    pub assignee_label: String,
    /// Assignment selector options
    pub options: Vec<SelectOption>,
}

/// Rendered list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFrame {
    /// One row per todo, in list order
    pub rows: Vec<RowFrame>,
    /// Whether the list is non-empty and every todo is done
    pub all_done: bool,
    /// Directory status line
    pub directory: DirectoryStatus,
}

impl fmt::Display for ListFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            writeln!(f, "  (nothing to do)")?;
        }

        for row in &self.rows {
            let mark = if row.is_done { 'x' } else { ' ' };
            writeln!(
                f,
                "{:>3} [{mark}] {}  @ {}",
                row.index, row.title, row.assignee_label
            )?;
        }

        if self.all_done {
            writeln!(f, "  all done!")?;
        }

        write!(f, "  {}", self.directory)
    }
}

/// List view: renders todos and owns the user directory for its lifetime
///
/// The directory is fetched once, on the first [`mount`](Self::mount).
/// Dropping the view drops its directory store, which aborts a fetch that is
/// still in flight; its result is never applied anywhere.
#[derive(Debug)]
pub struct ListView {
    directory: DirectoryStore,
    mounted: bool,
}

impl ListView {
    /// Creates an unmounted view reading users from `directory`
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory: Store::new(
                DirectoryState::NotRequested,
                DirectoryReducer::new(),
                DirectoryEnvironment::new(directory),
            ),
            mounted: false,
        }
    }

    /// Mount the view, starting the directory fetch the first time
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory store is shutting down.
    pub async fn mount(&mut self) -> Result<(), StoreError> {
        if self.mounted {
            return Ok(());
        }

        self.mounted = true;
        self.directory.send(DirectoryAction::Load).await?;
        Ok(())
    }

    /// Whether [`mount`](Self::mount) has run
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Unmount the view, cancelling a fetch that is still in flight
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory store is shutting down.
    pub async fn unmount(&mut self) -> Result<(), StoreError> {
        if !self.mounted {
            return Ok(());
        }

        self.mounted = false;
        self.directory.send(DirectoryAction::Cancel).await?;
        Ok(())
    }

    /// Current directory state
    pub async fn directory_state(&self) -> DirectoryState {
        self.directory.snapshot().await
    }

    /// Receiver that changes whenever the directory state is updated
    #[must_use]
    pub fn directory_revisions(&self) -> watch::Receiver<u64> {
        self.directory.subscribe_revisions()
    }

    /// Render `todos` against the current directory
    ///
    /// `all_done` is computed from `todos` on every call.
    pub async fn render(&self, todos: &TodoList) -> ListFrame {
        let state = self.directory_state().await;
        Self::frame(todos, &state)
    }

    fn frame(todos: &TodoList, state: &DirectoryState) -> ListFrame {
        let users: &[AssignableUser] = state.users();

        let rows = todos
            .iter()
            .enumerate()
            .map(|(index, todo)| {
                let selector = AssignmentWidget::new(index, todo.user);
                RowFrame {
                    index,
                    is_done: todo.is_done,
                    title: todo.title.clone(),
                    assignee: todo.user,
                    assignee_label: selector.current_label(users),
                    options: selector.options(users),
                }
            })
            .collect();

        ListFrame {
            rows,
            all_done: todos.all_done(),
            directory: DirectoryStatus::from(state),
        }
    }

    /// Checkbox click on row `index`
    #[must_use]
    pub const fn on_toggle(&self, index: usize) -> TodoAction {
        TodoAction::Toggle { index }
    }

    /// Selection change on row `index`
    #[must_use]
    pub fn on_assign(&self, todos: &TodoList, index: usize, value: &str) -> Option<TodoAction> {
        let current = todos.get(index).and_then(|todo| todo.user);
        AssignmentWidget::new(index, current).on_select(value)
    }

    /// Remove button on row `index`
    #[must_use]
    pub const fn on_remove(&self, index: usize) -> TodoAction {
        TodoAction::Remove { index }
    }

    /// Bulk toggle, committed as a single `REPLACE_ALL`
    ///
    /// Marks everything done, or everything open when all todos already are.
    /// An empty list has nothing to toggle.
    #[must_use]
    pub fn on_toggle_all(&self, todos: &TodoList) -> Option<TodoAction> {
        if todos.is_empty() {
            return None;
        }

        Some(TodoAction::ReplaceAll {
            list: todos.toggled_all(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::mocks::StaticDirectory;
    use crate::types::Todo;

    fn list() -> TodoList {
        TodoList::from(vec![
            Todo::new("Buy milk").with_done(true),
            Todo::new("Walk dog").with_user(UserId::new(2)),
        ])
    }

    #[test]
    fn frame_renders_rows_and_status() {
        let users: Arc<[AssignableUser]> = Arc::from(vec![AssignableUser::new(2, "Ervin Howell")]);
        let frame = ListView::frame(&list(), &DirectoryState::Loaded(users));

        assert_eq!(frame.rows.len(), 2);
        assert!(frame.rows[0].is_done);
        assert_eq!(frame.rows[1].assignee_label, "Ervin Howell");
        assert!(!frame.all_done);
        assert_eq!(frame.directory, DirectoryStatus::Ready(1));

        let text = frame.to_string();
        assert!(text.contains("[x] Buy milk"));
        assert!(text.contains("users: 1 available"));
    }

    #[test]
    fn status_distinguishes_loading_failed_and_empty() {
        assert_eq!(DirectoryStatus::from(&DirectoryState::Loading), DirectoryStatus::Loading);
        assert_eq!(
            DirectoryStatus::from(&DirectoryState::Loaded(Arc::from(Vec::new()))),
            DirectoryStatus::Empty
        );
        assert_eq!(
            DirectoryStatus::from(&DirectoryState::Failed("boom".into())),
            DirectoryStatus::Failed("boom".into())
        );
    }

    #[test]
    fn all_done_follows_rendered_list() {
        let done = list().toggle_at(1);
        let frame = ListView::frame(&done, &DirectoryState::NotRequested);
        assert!(frame.all_done);

        let empty = ListView::frame(&TodoList::new(), &DirectoryState::NotRequested);
        assert!(!empty.all_done);
        assert!(empty.to_string().contains("nothing to do"));
    }

    #[tokio::test]
    #[allow(clippy::panic)] // Test code can panic
    async fn row_callbacks_build_requests() {
        let view = ListView::new(Arc::new(StaticDirectory::sample()));
        let todos = list();

        assert_eq!(view.on_toggle(1), TodoAction::Toggle { index: 1 });
        assert_eq!(view.on_remove(0), TodoAction::Remove { index: 0 });
        assert_eq!(
            view.on_assign(&todos, 0, "1"),
            Some(TodoAction::Assign {
                index: 0,
                user_id: UserId::new(1)
            })
        );

        let Some(TodoAction::ReplaceAll { list }) = view.on_toggle_all(&todos) else {
            panic!("expected a REPLACE_ALL request");
        };
        assert!(list.all_done());
        assert_eq!(view.on_toggle_all(&TodoList::new()), None);
    }
}
