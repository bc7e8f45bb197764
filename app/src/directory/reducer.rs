//! One-shot user directory feature.
//!
//! ```text
//! NotRequested --Load--> Loading --UsersLoaded--> Loaded
//!                           |  \--LoadFailed----> Failed
//!                           \----Cancel---------> NotRequested
//! ```

use super::{AssignableUser, DirectoryError, UserDirectory};
use std::sync::Arc;
use todoboard_core::{
    SmallVec,
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec,
};
use todoboard_macros::Action;

/// Id the in-flight fetch is registered under
pub const FETCH_USERS: EffectId = EffectId::new("fetch-users");

/// Directory state as seen by the list view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DirectoryState {
    /// No fetch has been started
    #[default]
    NotRequested,
    /// A fetch is in flight
    Loading,
    /// The directory answered; the list may be empty
    Loaded(Arc<[AssignableUser]>),
    /// The fetch failed; the message is kept for display
    Failed(String),
}

impl DirectoryState {
    /// Loaded users, or an empty slice in every other state
    #[must_use]
    pub fn users(&self) -> &[AssignableUser] {
        match self {
            Self::Loaded(users) => &users[..],
            _ => &[],
        }
    }

    /// Returns true while a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Directory actions
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum DirectoryAction {
    /// Start the one-shot fetch
    #[request]
    Load,

    /// Abort an in-flight fetch
    #[request]
    Cancel,

    /// The fetch resolved with users
    #[event]
    UsersLoaded {
        /// Users returned by the directory
        users: Vec<AssignableUser>,
    },

    /// The fetch failed
    #[event]
    LoadFailed {
        /// Why the fetch failed
        error: DirectoryError,
    },
}

/// Dependencies of the directory reducer
#[derive(Clone)]
pub struct DirectoryEnvironment {
    /// Source of assignable users
    pub directory: Arc<dyn UserDirectory>,
}

impl DirectoryEnvironment {
    /// Creates an environment around `directory`
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}

impl std::fmt::Debug for DirectoryEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the user directory
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectoryReducer;

impl DirectoryReducer {
    /// Creates a new `DirectoryReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fetch(env: &DirectoryEnvironment) -> Effect<DirectoryAction> {
        let directory = Arc::clone(&env.directory);
        Effect::future(async move {
            let action = match directory.fetch_users().await {
                Ok(users) => DirectoryAction::UsersLoaded { users },
                Err(error) => DirectoryAction::LoadFailed { error },
            };
            Some(action)
        })
        .cancellable(FETCH_USERS)
    }
}

impl Reducer for DirectoryReducer {
    type State = DirectoryState;
    type Action = DirectoryAction;
    type Environment = DirectoryEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DirectoryAction::Load => {
                if *state != DirectoryState::NotRequested {
                    tracing::debug!(?state, "Directory already requested, ignoring load");
                    return SmallVec::new();
                }
                tracing::info!("Loading user directory");
                *state = DirectoryState::Loading;
                smallvec![Self::fetch(env)]
            },

            DirectoryAction::Cancel => {
                if !state.is_loading() {
                    return SmallVec::new();
                }
                tracing::debug!("Cancelling user directory fetch");
                *state = DirectoryState::NotRequested;
                smallvec![Effect::Cancel(FETCH_USERS)]
            },

            DirectoryAction::UsersLoaded { users } => {
                if state.is_loading() {
                    tracing::info!(count = users.len(), "User directory loaded");
                    *state = DirectoryState::Loaded(users.into());
                } else {
                    tracing::debug!("Ignoring directory result outside of loading");
                }
                SmallVec::new()
            },

            DirectoryAction::LoadFailed { error } => {
                if state.is_loading() {
                    tracing::warn!(error = %error, "User directory fetch failed");
                    *state = DirectoryState::Failed(error.to_string());
                } else {
                    tracing::debug!("Ignoring directory failure outside of loading");
                }
                SmallVec::new()
            },
        }
    }
}
