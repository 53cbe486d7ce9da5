//! # Recauda Runtime
//!
//! Runtime for the Recauda UI state layer.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling for one screen.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation**: In-flight tasks are grouped by [`EffectId`] and can be
//!   aborted individually or all at once when the screen is disposed
//!
//! ## Example
//!
//! ```ignore
//! use recauda_runtime::Store;
//!
//! let store = Store::new(SnackbarState::default(), SnackbarReducer::new(config), ());
//!
//! // Send an action
//! store.send(SnackbarAction::Show { notice, duration }).await?;
//!
//! // Read state
//! let phase = store.state(|s| s.phase).await;
//!
//! // Unmount: cancel timers, reject further actions
//! store.dispose();
//! ```

use recauda_core::{EffectId, effect::Effect, reducer::Reducer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The store was disposed (its screen unmounted)
        ///
        /// Returned by `send()` after `dispose()`; the action is dropped.
        #[error("Store has been disposed")]
        Disposed,

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

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of one
/// action to complete. Aborted effects count as complete.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(WizardAction::Confirm).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The submit effect has finished (and fed its result back)
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and its internal tracking context
    fn new(scopes: Vec<EffectId>) -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
            scopes,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects of this action still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing can still be running.
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
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
///
/// `scopes` holds the ids of every enclosing `Effect::Cancellable`, innermost
/// last; spawned tasks are registered under all of them.
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
    scopes: Vec<EffectId>,
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

    /// Same counter, one more enclosing cancellation scope
    fn scoped(&self, id: EffectId) -> Self {
        let mut scopes = self.scopes.clone();
        scopes.push(id);
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
            scopes,
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
            scopes: self.scopes.clone(),
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Created before the task is spawned so an aborted task that never ran
/// still releases its slot.
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

/// Internal: abort handles of spawned effect tasks
#[derive(Default)]
struct TaskRegistry {
    all: Vec<AbortHandle>,
    groups: HashMap<EffectId, Vec<AbortHandle>>,
}

impl TaskRegistry {
    fn register(&mut self, scopes: &[EffectId], handle: &AbortHandle) {
        self.all.retain(|h| !h.is_finished());
        self.all.push(handle.clone());

        for id in scopes {
            let group = self.groups.entry(id.clone()).or_default();
            group.retain(|h| !h.is_finished());
            group.push(handle.clone());
        }
    }

    /// Abort every task in the group; returns how many were still running
    fn cancel(&mut self, id: &EffectId) -> usize {
        self.groups
            .remove(id)
            .map_or(0, |handles| abort_running(&handles))
    }

    fn cancel_all(&mut self) -> usize {
        self.groups.clear();
        let handles = std::mem::take(&mut self.all);
        abort_running(&handles)
    }
}

fn abort_running(handles: &[AbortHandle]) -> usize {
    let mut aborted = 0;
    for handle in handles.iter().filter(|h| !h.is_finished()) {
        handle.abort();
        aborted += 1;
    }
    aborted
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectId, EffectTracking, Mutex, Ordering, PoisonError, Reducer, RwLock,
        StoreError, TaskRegistry,
    };
    use crate::metrics::{
        COMMANDS_REJECTED, COMMANDS_TOTAL, EFFECTS_CANCELLED, EFFECTS_COUNT, EFFECTS_EXECUTED,
        REDUCER_DURATION, STORE_DISPOSED,
    };
    use std::future::Future;
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (screen logic)
    /// 3. Environment (injected collaborators)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        disposed: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        tasks: Arc<Mutex<TaskRegistry>>,
        /// Action broadcast channel for observing actions produced by effects.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast capacity defaults to 16 (see
        /// [`with_broadcast_capacity`](Self::with_broadcast_capacity)).
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                disposed: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                tasks: Arc::new(Mutex::new(TaskRegistry::default())),
                action_broadcast,
            }
        }

        /// Dispose the store (screen unmount)
        ///
        /// Aborts every in-flight effect task and rejects later `send()` calls
        /// with [`StoreError::Disposed`]. Delayed actions that were scheduled
        /// before disposal never reach the reducer. Idempotent.
        pub fn dispose(&self) {
            if self.disposed.swap(true, Ordering::AcqRel) {
                return;
            }

            let aborted = self
                .tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .cancel_all();

            tracing::debug!(aborted, "Store disposed");
            metrics::counter!(STORE_DISPOSED).increment(1);
            metrics::counter!(EFFECTS_CANCELLED).increment(aborted as u64);
        }

        /// Returns true once [`dispose`](Self::dispose) has been called
        #[must_use]
        pub fn is_disposed(&self) -> bool {
            self.disposed.load(Ordering::Acquire)
        }

        /// Number of effect tasks currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// 1. Stops accepting new actions
        /// 2. Waits for pending effects to complete (up to `timeout`)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects don't complete
        /// within the timeout period.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");

            // Set shutdown flag to reject new actions
            self.shutdown.store(true, Ordering::Release);

            let start = tokio::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

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

                tracing::debug!(
                    pending_effects = pending,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Waiting for effects to complete"
                );

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns after starting effect execution, not completion.
        /// Concurrent sends serialize at the reducer.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Disposed`] after [`dispose`](Self::dispose) and
        /// [`StoreError::ShutdownInProgress`] once shutdown has started.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.disposed.load(Ordering::Acquire) {
                tracing::debug!("Rejected action: store is disposed");
                metrics::counter!(COMMANDS_REJECTED).increment(1);
                return Err(StoreError::Disposed);
            }
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!(COMMANDS_REJECTED).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!(COMMANDS_TOTAL).increment(1);

            let (handle, tracking) = EffectHandle::new(Vec::new());

            let effects = {
                let mut state = self.state.write().await;

                // Disposal may have happened while waiting for the lock.
                if self.disposed.load(Ordering::Acquire) {
                    return Err(StoreError::Disposed);
                }

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!(REDUCER_DURATION).record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                // Note: Precision loss acceptable for metrics (effect counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                metrics::histogram!(EFFECTS_COUNT).record(effects.len() as f64);

                effects
            };

            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by its effects
        ///
        /// Subscribes to the action broadcast before sending, so a fast effect
        /// cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before `timeout`
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::Disposed`] / [`StoreError::ShutdownInProgress`]: from `send`
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Initial actions passed to `send` are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let visible = store.state(|s| s.view().rows.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Feed an effect-produced action back into the store
        async fn feed_back(&self, action: A)
        where
            R: Clone,
            E: Clone,
        {
            let _ = self.action_broadcast.send(action.clone());
            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped effect feedback");
            }
        }

        /// Spawn a tracked task and register it for cancellation
        fn spawn_tracked<F>(&self, tracking: &EffectTracking, task: F)
        where
            F: Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);

            let guard = DecrementGuard(tracking.clone());
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            let join = tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                task.await;
            });

            self.tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .register(&tracking.scopes, &join.abort_handle());
        }

        fn cancel_group(&self, id: &EffectId) {
            let aborted = self
                .tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .cancel(id);

            if aborted > 0 {
                tracing::debug!(%id, aborted, "Cancelled in-flight effects");
                metrics::counter!(EFFECTS_CANCELLED).increment(aborted as u64);
            }
        }

        /// Execute an effect with tracking
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned, so pass by value is intentional
        #[tracing::instrument(skip(self, effect, tracking), name = "execute_effect")]
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            if self.disposed.load(Ordering::Acquire) {
                tracing::trace!("Store disposed, skipping effect");
                return;
            }

            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "future").increment(1);

                    let store = self.clone();
                    self.spawn_tracked(&tracking, async move {
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "delay").increment(1);

                    let store = self.clone();
                    self.spawn_tracked(&tracking, async move {
                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay completed, sending action");
                        store.feed_back(*action).await;
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect_internal(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "sequential").increment(1);

                    let store = self.clone();
                    let scopes = tracking.scopes.clone();
                    self.spawn_tracked(&tracking, async move {
                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            let (mut step, step_tracking) = EffectHandle::new(scopes.clone());
                            store.execute_effect_internal(effect, step_tracking);
                            step.wait().await;
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                },
                Effect::Cancellable { id, effect } => {
                    tracing::trace!(%id, "Executing Effect::Cancellable");
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "cancellable").increment(1);

                    // Latest request wins.
                    self.cancel_group(&id);
                    self.execute_effect_internal(*effect, tracking.scoped(id));
                },
                Effect::Cancel(id) => {
                    tracing::trace!(%id, "Executing Effect::Cancel");
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "cancel").increment(1);
                    self.cancel_group(&id);
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                disposed: Arc::clone(&self.disposed),
                pending_effects: Arc::clone(&self.pending_effects),
                tasks: Arc::clone(&self.tasks),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("disposed", &self.disposed.load(Ordering::Acquire))
                .field("pending_effects", &self.pending_effects.load(Ordering::Acquire))
                .finish_non_exhaustive()
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use recauda_core::{SmallVec, smallvec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        StartTimer,
        StopTimer,
        ProducePanickingEffect,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    const TIMER: EffectId = EffectId::from_static("timer");

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceDelayedAction => {
                    smallvec![Effect::Delay {
                        duration: Duration::from_millis(10),
                        action: Box::new(TestAction::Increment),
                    }]
                },
                TestAction::ProduceParallelEffects => {
                    smallvec![Effect::Parallel(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    ])]
                },
                TestAction::ProduceSequentialEffects => {
                    smallvec![Effect::Sequential(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Decrement) })),
                    ])]
                },
                TestAction::StartTimer => {
                    smallvec![
                        Effect::Delay {
                            duration: Duration::from_millis(100),
                            action: Box::new(TestAction::Increment),
                        }
                        .cancellable(TIMER)
                    ]
                },
                TestAction::StopTimer => smallvec![Effect::Cancel(TIMER)],
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = store();
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_multiple_actions() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;
        store.send(TestAction::Decrement).await?;
        store.send(TestAction::NoOp).await?;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_future() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_delay() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await?;
        assert_eq!(store.state(|s| s.value).await, 0);

        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_parallel() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| s.value).await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_sequential() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        // +1 +1 -1
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_delay() -> Result<(), StoreError> {
        let store = store();

        let mut timer = store.send(TestAction::StartTimer).await?;
        store.send(TestAction::StopTimer).await?;

        timer.wait().await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.state(|s| s.value).await, 0);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellable_restart_keeps_only_latest() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::StartTimer).await?;
        tokio::time::sleep(Duration::from_millis(60)).await;
        let mut second = store.send(TestAction::StartTimer).await?;

        // The first timer would have fired at 100ms.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        second.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_aborts_effects_and_rejects_sends() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await?;
        store.dispose();
        store.dispose();

        handle.wait().await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(store.is_disposed());
        assert_eq!(store.state(|s| s.value).await, 0);
        assert!(matches!(
            store.send(TestAction::Increment).await,
            Err(StoreError::Disposed)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_send_and_wait_for_feedback() -> Result<(), StoreError> {
        let store = store();

        let action = store
            .send_and_wait_for(
                TestAction::ProduceEffect,
                |a| *a == TestAction::Increment,
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(action, TestAction::Increment);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_and_wait_for_times_out() {
        let store = store();

        let result = store
            .send_and_wait_for(
                TestAction::NoOp,
                |a| *a == TestAction::Increment,
                Duration::from_millis(20),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() -> Result<(), StoreError> {
        let store1 = store();
        let store2 = store1.clone();

        store1.send(TestAction::Increment).await?;
        assert_eq!(store2.state(|s| s.value).await, 1);

        store2.dispose();
        assert!(store1.is_disposed());
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        store.send(TestAction::Increment).await?;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = store();

        store.shutdown(Duration::from_secs(1)).await?;
        assert!(matches!(
            store.send(TestAction::Increment).await,
            Err(StoreError::ShutdownInProgress)
        ));
        Ok(())
    }

    #[test]
    fn test_completed_handle_has_nothing_pending() {
        assert_eq!(EffectHandle::completed().pending(), 0);
    }
}
