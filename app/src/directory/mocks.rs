//! In-memory user directories
//!
//! Each mock counts how many fetches it served, which is how tests check the
//! one-fetch-per-mount rule.

use super::{AssignableUser, DirectoryError, UserDirectory};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<AssignableUser>, DirectoryError>> + Send + 'a>>;

/// Directory that always returns the same users
#[derive(Debug, Default)]
pub struct StaticDirectory {
    users: Vec<AssignableUser>,
    calls: AtomicUsize,
}

impl StaticDirectory {
    /// Directory serving `users`
    #[must_use]
    pub const fn new(users: Vec<AssignableUser>) -> Self {
        Self {
            users,
            calls: AtomicUsize::new(0),
        }
    }

    /// Directory with two well-known users (ids 1 and 2)
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            AssignableUser::new(1, "Leanne Graham"),
            AssignableUser::new(2, "Ervin Howell"),
        ])
    }

    /// Number of fetches served
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UserDirectory for StaticDirectory {
    fn fetch_users(&self) -> FetchFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let users = self.users.clone();
        Box::pin(async move { Ok(users) })
    }
}

/// Directory whose every fetch fails with the same error
#[derive(Debug)]
pub struct FailingDirectory {
    error: DirectoryError,
    calls: AtomicUsize,
}

impl FailingDirectory {
    /// Directory failing with `error`
    #[must_use]
    pub const fn new(error: DirectoryError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches attempted
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UserDirectory for FailingDirectory {
    fn fetch_users(&self) -> FetchFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let error = self.error.clone();
        Box::pin(async move { Err(error) })
    }
}

/// Directory whose fetches never resolve
#[derive(Debug, Default)]
pub struct PendingDirectory {
    calls: AtomicUsize,
}

impl PendingDirectory {
    /// Creates a pending directory
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches started
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UserDirectory for PendingDirectory {
    fn fetch_users(&self) -> FetchFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(std::future::pending())
    }
}
