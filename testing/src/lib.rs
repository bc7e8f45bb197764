//! # Todoboard Testing
//!
//! Testing utilities and helpers for the todoboard reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertion helpers
//! - [`init_test_tracing`] to route `tracing` output through the test harness
//!
//! ## Example
//!
//! ```ignore
//! use todoboard_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoReducer)
//!     .with_env(())
//!     .given_state(TodoList::default())
//!     .when_action(TodoAction::Add { todo: Todo::new("Buy milk") })
//!     .then_state(|list| assert_eq!(list.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Install a test-friendly `tracing` subscriber
///
/// Output is captured by the test harness and only shown for failing tests.
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
