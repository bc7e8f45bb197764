//! # Todoboard Runtime
//!
//! Runtime implementation for the todoboard reducer architecture.
//!
//! This crate provides the [`Store`]: the single owner of a piece of state,
//! which runs a reducer for every action and executes the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, serializes reducer execution, publishes revisions
//! - **Effect Executor**: Runs effect descriptions and feeds produced actions back
//! - **Cancellation registry**: Tracks cancellable effects by [`EffectId`]
//!
//! ## Example
//!
//! ```ignore
//! use todoboard_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```
//!
//! ## Effect lifetime
//!
//! Spawned effects hold only a weak reference to the store. When every
//! [`Store`] handle has been dropped, actions produced by still-running
//! effects are discarded instead of being reduced, and every registered
//! cancellable effect is aborted.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use todoboard_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
};
use tokio::sync::{RwLock, broadcast, watch};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effects tracked by an [`EffectHandle`](super::EffectHandle)
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use todoboard_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Actions fed back by those effects are reduced before the
/// effect counts as complete; effects those follow-up actions start are not
/// tracked by this handle.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and the tracking context that feeds it
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (_tx, rx) = watch::channel(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of tracked effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            // Every tracking context is gone, nothing can still be running
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Created before the effect task is spawned so an aborted task that never
/// got polled still releases its slot.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A registered cancellable effect
struct Registration {
    generation: u64,
    abort: AbortHandle,
}

/// Shared store internals
///
/// Spawned effects hold a `Weak` to this, so the state can go away while
/// effects are still in flight.
struct StoreInner<R: Reducer> {
    state: RwLock<R::State>,
    reducer: R,
    environment: R::Environment,
    shutdown: AtomicBool,
    pending_effects: Arc<AtomicUsize>,
    revision: watch::Sender<u64>,
    action_broadcast: broadcast::Sender<R::Action>,
    cancellables: Mutex<HashMap<EffectId, Registration>>,
    next_generation: AtomicU64,
    default_shutdown_timeout: Duration,
}

impl<R: Reducer> StoreInner<R> {
    fn lock_cancellables(&self) -> MutexGuard<'_, HashMap<EffectId, Registration>> {
        self.cancellables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget a finished cancellable effect unless a newer one took its id
    fn release(&self, id: &EffectId, generation: u64) {
        let mut registry = self.lock_cancellables();
        if registry
            .get(id)
            .is_some_and(|registration| registration.generation == generation)
        {
            registry.remove(id);
        }
    }
}

impl<R: Reducer> Drop for StoreInner<R> {
    fn drop(&mut self) {
        let registry = self
            .cancellables
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for (id, registration) in registry.drain() {
            tracing::debug!(effect_id = %id, "Store dropped, aborting cancellable effect");
            registration.abort.abort();
        }
    }
}

type BoxedEffectFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock`; the reducer runs under the write lock)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop and cancellation)
///
/// Cloning a `Store` yields another handle to the same state.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("revision", &*self.inner.revision.borrow())
            .field("shutdown", &self.inner.shutdown.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<R> Store<R>
where
    R: Reducer + Send + Sync + 'static,
    R::State: Send + Sync + 'static,
    R::Action: Clone + Send + Sync + 'static,
    R::Environment: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: R::State, reducer: R, environment: R::Environment) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new Store with custom configuration
    #[must_use]
    pub fn with_config(
        initial_state: R::State,
        reducer: R,
        environment: R::Environment,
        config: StoreConfig,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
        let (revision, _) = watch::channel(0);

        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                revision,
                action_broadcast,
                cancellables: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
                default_shutdown_timeout: config.default_shutdown_timeout,
            }),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires write lock on state
    /// 2. Calls reducer with (state, action, environment)
    /// 3. Bumps the revision counter
    /// 4. Starts the returned effects (does not wait for them)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: R::Action) -> Result<EffectHandle, StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.inner.state.write().await;

            let start = std::time::Instant::now();
            let effects = self
                .inner
                .reducer
                .reduce(&mut *state, action, &self.inner.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            effects
        };

        self.inner.revision.send_modify(|revision| *revision += 1);

        tracing::trace!("Reducer returned {} effects", effects.len());
        for effect in effects {
            self.execute_effect(effect, &tracking);
        }

        Ok(handle)
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let count = store.state(|s| s.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&R::State) -> T,
    {
        let state = self.inner.state.read().await;
        f(&*state)
    }

    /// Clone the current state
    pub async fn snapshot(&self) -> R::State
    where
        R::State: Clone,
    {
        self.state(Clone::clone).await
    }

    /// Number of actions reduced so far
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Subscribe to revision changes
    ///
    /// The receiver observes a new value after every reduced action, which is
    /// the signal views use to decide whether to re-render.
    #[must_use]
    pub fn subscribe_revisions(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Subscribe to actions produced by effects
    ///
    /// Every action an effect feeds back into the store is broadcast here
    /// before it is reduced.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<R::Action> {
        self.inner.action_broadcast.subscribe()
    }

    /// Returns true while a cancellable effect is registered under `id`
    #[must_use]
    pub fn is_effect_running(&self, id: &EffectId) -> bool {
        self.inner.lock_cancellables().contains_key(id)
    }

    /// Abort every registered cancellable effect
    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.inner.lock_cancellables().drain().collect();
        for (id, registration) in drained {
            tracing::debug!(effect_id = %id, "Cancelling effect");
            metrics::counter!("store.effects.cancelled").increment(1);
            registration.abort.abort();
        }
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions) and waits for pending
    /// effects to finish. Passing `None` uses the configured default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
    /// pending effects complete.
    pub async fn shutdown(&self, timeout: Option<Duration>) -> Result<(), StoreError> {
        let timeout = timeout.unwrap_or(self.inner.default_shutdown_timeout);
        tracing::info!("Initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.inner.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.inner.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(
                    pending_effects = pending,
                    "Shutdown timeout: {} effects still running",
                    pending
                );
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Start executing an effect
    ///
    /// `None` and `Cancel` complete inline. Everything else runs on a
    /// spawned task tracked by `tracking`; `Cancellable` tasks are also
    /// registered under their id, replacing any effect already running
    /// under it.
    fn execute_effect(&self, effect: Effect<R::Action>, tracking: &EffectTracking) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Cancel(id) => {
                metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                let removed = self.inner.lock_cancellables().remove(&id);
                if let Some(registration) = removed {
                    tracing::debug!(effect_id = %id, "Cancelling effect");
                    metrics::counter!("store.effects.cancelled").increment(1);
                    registration.abort.abort();
                } else {
                    tracing::trace!(effect_id = %id, "Cancel requested for idle effect");
                }
            },
            Effect::Cancellable { id, effect } => {
                metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);
                let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
                let weak = Arc::downgrade(&self.inner);
                let release_id = id.clone();

                let task = async move {
                    Self::drive(weak.clone(), *effect).await;
                    if let Some(inner) = weak.upgrade() {
                        inner.release(&release_id, generation);
                    }
                };

                // Hold the registry while spawning so the task cannot release
                // its slot before it has been registered.
                let mut registry = self.inner.lock_cancellables();
                let abort = self.spawn_tracked(Box::pin(task), tracking);
                if let Some(previous) = registry.insert(id.clone(), Registration { generation, abort }) {
                    tracing::debug!(effect_id = %id, "Replacing in-flight effect");
                    previous.abort.abort();
                }
            },
            other => {
                metrics::counter!("store.effects.executed", "type" => "task").increment(1);
                let task = Self::drive(Arc::downgrade(&self.inner), other);
                self.spawn_tracked(task, tracking);
            },
        }
    }

    fn spawn_tracked(&self, task: BoxedEffectFuture, tracking: &EffectTracking) -> AbortHandle {
        tracking.increment();
        self.inner.pending_effects.fetch_add(1, Ordering::SeqCst);
        let guards = (
            DecrementGuard(tracking.clone()),
            AtomicCounterGuard(Arc::clone(&self.inner.pending_effects)),
        );

        tokio::spawn(async move {
            let _guards = guards;
            task.await;
        })
        .abort_handle()
    }

    /// Run an effect to completion inside the current task
    fn drive(weak: Weak<StoreInner<R>>, effect: Effect<R::Action>) -> BoxedEffectFuture {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => {
                    if let Some(action) = fut.await {
                        Self::feed_back(&weak, action).await;
                    } else {
                        tracing::trace!("Effect::Future completed with no action");
                    }
                },
                Effect::Parallel(effects) => {
                    futures::future::join_all(
                        effects
                            .into_iter()
                            .map(|effect| Self::drive(weak.clone(), effect)),
                    )
                    .await;
                },
                Effect::Sequential(effects) => {
                    for effect in effects {
                        Self::drive(weak.clone(), effect).await;
                    }
                },
                nested @ (Effect::Cancellable { .. } | Effect::Cancel(_)) => {
                    // Nested registrations run on their own task, untracked by the parent
                    if let Some(inner) = weak.upgrade() {
                        let (_handle, tracking) = EffectHandle::new();
                        Self { inner }.execute_effect(nested, &tracking);
                    }
                },
            }
        })
    }

    /// Send an action produced by an effect back into the store, if it still exists
    async fn feed_back(weak: &Weak<StoreInner<R>>, action: R::Action) {
        let Some(inner) = weak.upgrade() else {
            tracing::debug!("Store dropped before effect resolved, discarding action");
            metrics::counter!("store.effects.discarded").increment(1);
            return;
        };

        let store = Self { inner };
        let _ = store.inner.action_broadcast.send(action.clone());
        if let Err(error) = store.send(action).await {
            tracing::debug!(error = %error, "Effect feedback rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoboard_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, Default)]
    struct TestState {
        value: i32,
        log: Vec<u8>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Push(u8),
        ProduceEffect,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProduceDelayedIncrement,
        StartSlow,
        CancelSlow,
    }

    #[derive(Debug, Clone)]
    struct TestReducer;

    const SLOW: EffectId = EffectId::new("slow");

    fn never_then_increment() -> Effect<TestAction> {
        Effect::future(async {
            futures::future::pending::<()>().await;
            Some(TestAction::Increment)
        })
    }

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    SmallVec::new()
                },
                TestAction::Push(n) => {
                    state.log.push(n);
                    SmallVec::new()
                },
                TestAction::ProduceEffect => {
                    smallvec![Effect::future(async { Some(TestAction::Increment) })]
                },
                TestAction::ProduceParallelEffects => smallvec![Effect::merge(vec![
                    Effect::future(async { Some(TestAction::Increment) }),
                    Effect::future(async { Some(TestAction::Increment) }),
                    Effect::future(async { Some(TestAction::Increment) }),
                ])],
                TestAction::ProduceSequentialEffects => smallvec![Effect::chain(vec![
                    Effect::future(async {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Some(TestAction::Push(1))
                    }),
                    Effect::future(async { Some(TestAction::Push(2)) }),
                    Effect::future(async { Some(TestAction::Push(3)) }),
                ])],
                TestAction::ProduceDelayedIncrement => smallvec![Effect::future(async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Some(TestAction::Increment)
                })],
                TestAction::StartSlow => smallvec![never_then_increment().cancellable(SLOW)],
                TestAction::CancelSlow => smallvec![Effect::Cancel(SLOW)],
            }
        }
    }

    fn store() -> Store<TestReducer> {
        Store::new(TestState::default(), TestReducer, ())
    }

    #[tokio::test]
    async fn test_send_updates_state_and_revision() {
        let store = store();
        assert_eq!(store.revision(), 0);

        store.send(TestAction::Increment).await.unwrap();
        store.send(TestAction::Increment).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 2);
        assert_eq!(store.revision(), 2);
    }

    #[tokio::test]
    async fn test_revision_subscription_sees_change() {
        let store = store();
        let mut revisions = store.subscribe_revisions();

        store.send(TestAction::Push(9)).await.unwrap();

        assert!(revisions.has_changed().unwrap());
        assert_eq!(*revisions.borrow_and_update(), 1);
    }

    #[tokio::test]
    async fn test_future_effect_feeds_back() {
        let store = store();
        let mut actions = store.subscribe_actions();

        let mut handle = store.send(TestAction::ProduceEffect).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(actions.recv().await.unwrap(), TestAction::Increment);
    }

    #[tokio::test]
    async fn test_parallel_effects() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_sequential_effects_preserve_order() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.log.clone()).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_cancel_aborts_registered_effect() {
        let store = store();

        let mut handle = store.send(TestAction::StartSlow).await.unwrap();
        assert!(store.is_effect_running(&SLOW));
        assert_eq!(handle.pending(), 1);

        store.send(TestAction::CancelSlow).await.unwrap();
        assert!(!store.is_effect_running(&SLOW));

        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_cancellable_with_same_id_replaces_previous() {
        let store = store();

        let mut first = store.send(TestAction::StartSlow).await.unwrap();
        let _second = store.send(TestAction::StartSlow).await.unwrap();

        // The first registration was aborted when the second took its id
        first.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
        assert!(store.is_effect_running(&SLOW));

        store.cancel_all();
        assert!(!store.is_effect_running(&SLOW));
    }

    #[tokio::test]
    async fn test_dropped_store_discards_effect_result() {
        let store = store();
        let mut actions = store.subscribe_actions();

        let mut handle = store.send(TestAction::ProduceDelayedIncrement).await.unwrap();
        drop(store);

        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
        // Nothing was broadcast and the channel closed with the store
        assert!(matches!(
            actions.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_dropped_store_aborts_cancellable_effects() {
        let store = store();

        let mut handle = store.send(TestAction::StartSlow).await.unwrap();
        drop(store);

        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = store();

        store.shutdown(Some(Duration::from_secs(1))).await.unwrap();

        assert_eq!(
            store.send(TestAction::Increment).await.unwrap_err(),
            StoreError::ShutdownInProgress
        );
    }

    #[tokio::test]
    async fn test_shutdown_times_out_with_running_effect() {
        let store = store();
        store.send(TestAction::StartSlow).await.unwrap();

        let result = store.shutdown(Some(Duration::from_millis(30))).await;

        assert_eq!(result, Err(StoreError::ShutdownTimeout(1)));
        store.cancel_all();
    }

    #[tokio::test]
    async fn test_completed_handle_returns_immediately() {
        let mut handle = EffectHandle::completed();
        handle.wait_with_timeout(Duration::from_millis(10)).await.unwrap();
        assert_eq!(handle.pending(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_clones_state() {
        let store = store();
        store.send(TestAction::Push(4)).await.unwrap();

        let snapshot = store.snapshot().await;
        store.send(TestAction::Push(5)).await.unwrap();

        assert_eq!(snapshot.log, vec![4]);
        assert_eq!(store.state(|s| s.log.len()).await, 2);
    }
}
