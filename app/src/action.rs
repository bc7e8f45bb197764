//! Update requests accepted by the todo store.
//!
//! The JSON form is internally tagged by `"type"`:
//!
//! ```json
//! { "type": "ADD", "todo": { "title": "Buy milk", "isDone": false } }
//! { "type": "TOGGLE", "index": 0 }
//! { "type": "ASSIGN", "index": 0, "userId": "3" }
//! { "type": "REMOVE", "index": 0 }
//! { "type": "REPLACE_ALL", "list": [] }
//! ```
//!
//! Any other tag decodes to [`TodoAction::Unrecognized`], which leaves the
//! list unchanged.

use crate::types::{Todo, TodoList, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todoboard_macros::Action;

/// Update requests for the todo list
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a todo
    #[request]
    Add {
        /// Todo to append
        todo: Todo,
    },

    /// Flip `is_done` of the todo at `index`
    #[request]
    Toggle {
        /// Position in the list
        index: usize,
    },

    /// Assign the todo at `index` to a user
    #[request]
    Assign {
        /// Position in the list
        index: usize,
        /// Assignee, normalized to the numeric form
        #[serde(rename = "userId")]
        user_id: UserId,
    },

    /// Remove the todo at `index`
    #[request]
    Remove {
        /// Position in the list
        index: usize,
    },

    /// Replace the whole list at once
    #[request]
    ReplaceAll {
        /// The next list
        list: TodoList,
    },

    /// A request with a tag this version does not know
    #[serde(other)]
    Unrecognized,
}

/// Error returned when an update request cannot be decoded
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The payload is not a well-formed update request
    #[error("malformed update request: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl TodoAction {
    /// Decode an update request from its JSON form
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] for invalid JSON, a missing `"type"`,
    /// or fields of the wrong type (including negative indices).
    pub fn decode(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The index this request addresses, if any
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Toggle { index } | Self::Assign { index, .. } | Self::Remove { index } => {
                Some(*index)
            },
            Self::Add { .. } | Self::ReplaceAll { .. } | Self::Unrecognized => None,
        }
    }
}
