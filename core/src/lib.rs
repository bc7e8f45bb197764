//! # Todoboard Core
//!
//! Core traits and types for the todoboard reducer architecture.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a store
//! - **Action**: All possible inputs to a reducer (update requests and effect feedback)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies
//!
//! ## Example
//!
//! ```
//! use todoboard_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Inspects the action
        /// 2. Replaces state as needed
        /// 3. Returns effect descriptions to be executed by the runtime
        ///
        /// Most actions produce zero or one effect, so the return type stays
        /// on the stack for the common case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::borrow::Cow;
    use std::future::Future;
    use std::pin::Pin;

    /// Identifier for a cancellable effect
    ///
    /// Two effects registered under the same id are the same logical
    /// operation: starting a new one replaces the one in flight.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct EffectId(Cow<'static, str>);

    impl EffectId {
        /// Creates an id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(Cow::Borrowed(name))
        }

        /// Creates an id from an owned name
        #[must_use]
        pub fn owned(name: impl Into<String>) -> Self {
            Self(Cow::Owned(name.into()))
        }

        /// Returns the id as a string slice
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run an effect that can later be cancelled by id
        Cancellable {
            /// Name the effect is registered under
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },

        /// Cancel the in-flight effect registered under this id, if any
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap a future as an effect
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Register this effect under `id` so it can be cancelled
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

// Re-export commonly used types
pub use effect::{Effect, EffectId};
pub use reducer::Reducer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_id_display_matches_name() {
        let id = EffectId::new("user-directory");
        assert_eq!(id.to_string(), "user-directory");
        assert_eq!(id, EffectId::owned("user-directory"));
    }

    #[test]
    fn cancellable_wraps_inner_effect() {
        let effect: Effect<()> = Effect::future(async { None }).cancellable(EffectId::new("fetch"));
        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id.as_str(), "fetch");
                assert!(matches!(*effect, Effect::Future(_)));
            },
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn future_effect_resolves_to_action() {
        let effect: Effect<u8> = Effect::future(async { Some(7) });
        let Effect::Future(fut) = effect else {
            panic!("expected a future effect");
        };
        assert_eq!(tokio_test::block_on(fut), Some(7));
    }

    #[test]
    fn debug_output_names_variants() {
        let effect: Effect<()> = Effect::merge(vec![Effect::None, Effect::Cancel(EffectId::new("x"))]);
        let rendered = format!("{effect:?}");
        assert!(rendered.contains("Effect::Parallel"));
        assert!(rendered.contains("Effect::Cancel"));
        assert!(Effect::<()>::None.is_none());
    }
}
