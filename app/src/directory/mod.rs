//! User directory: the read-only source of assignable users.
//!
//! The directory is fetched once per list view mount. [`UserDirectory`] is
//! the seam; [`HttpUserDirectory`] is the production implementation and
//! [`mocks`] holds in-memory ones for tests and offline runs.

pub mod http;
pub mod mocks;
pub mod reducer;

use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

pub use http::HttpUserDirectory;
pub use reducer::{
    DirectoryAction, DirectoryEnvironment, DirectoryReducer, DirectoryState, FETCH_USERS,
};

/// A user todos can be assigned to
///
/// The remote directory returns more fields per user; only these two are read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignableUser {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
}

impl AssignableUser {
    /// Creates a user
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
        }
    }
}

/// Errors fetching the user directory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The request could not be sent or the connection failed
    #[error("user directory request failed: {0}")]
    RequestFailed(String),

    /// The directory answered with a non-success status
    #[error("user directory returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The response body was not a list of users
    #[error("failed to parse user directory response: {0}")]
    ResponseParseFailed(String),
}

/// Source of assignable users
///
/// Implementations perform one fetch per call and never retry.
pub trait UserDirectory: Send + Sync {
    /// Fetch the current list of assignable users
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] describing why the directory could not be read.
    fn fetch_users(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AssignableUser>, DirectoryError>> + Send + '_>>;
}
