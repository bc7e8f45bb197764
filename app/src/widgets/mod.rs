//! Headless view models.
//!
//! Widgets hold only their own local state (the draft, the mounted flag) and
//! turn user input into [`TodoAction`](crate::action::TodoAction) requests.
//! Rendering produces plain frame structs with a text `Display`; nothing here
//! writes to a terminal.

pub mod assignment;
pub mod input;
pub mod list_view;

pub use assignment::{AssignmentWidget, SelectOption};
pub use input::InputWidget;
pub use list_view::{DirectoryStatus, ListFrame, ListView, RowFrame};

/// A single key press delivered to a widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Delete the last character
    Backspace,
    /// Confirm
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
}
