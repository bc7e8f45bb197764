//! Todo list with per-item user assignment.
//!
//! A single [`TodoStore`] owns the list. Widgets turn UI events into tagged
//! [`TodoAction`] requests, the [`TodoReducer`] computes the next immutable
//! snapshot, and the list view re-renders from it. Assignable users come from
//! a [`UserDirectory`] fetched once when the list view mounts.
//!
//! - [`types`]: `Todo`, `TodoList` snapshots and `UserId`
//! - [`action`]: update requests and their JSON form
//! - [`reducer`]: the todo reducer
//! - [`directory`]: user directory client and its reducer
//! - [`widgets`]: input, assignment selector and list view
//! - [`app`]: the root tying them together
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todoboard::directory::mocks::StaticDirectory;
//! use todoboard::{TodoApp, UiEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = TodoApp::new(Arc::new(StaticDirectory::sample()));
//! app.mount().await?;
//!
//! app.handle(UiEvent::DraftChanged("Buy milk".to_string())).await?;
//! app.handle(UiEvent::Key(todoboard::widgets::Key::Enter)).await?;
//! app.handle(UiEvent::Assign { index: 0, value: "1".to_string() }).await?;
//!
//! println!("{}", app.render().await);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod app;
pub mod command;
pub mod config;
pub mod directory;
pub mod reducer;
pub mod types;
pub mod widgets;

// Re-export commonly used types
pub use action::{DecodeError, TodoAction};
pub use app::{AppError, Frame, TodoApp, TodoStore, UiEvent};
pub use config::{AppConfig, ConfigError};
pub use directory::{AssignableUser, DirectoryError, HttpUserDirectory, UserDirectory};
pub use reducer::TodoReducer;
pub use types::{Todo, TodoList, UserId, all_done};
