//! # OctoMarket Runtime
//!
//! Runtime implementation for the OctoMarket client flows.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling for one screen instance.
//!
//! ## Core Components
//!
//! - **Store**: Owns a screen's state and executes the effects its reducer returns
//! - **Task registry**: Every spawned effect is registered with an abort handle so
//!   it can be cancelled by id (`Effect::Cancel`) or all at once on teardown
//! - **Feedback loop**: Actions produced by timers and futures are sent back to the reducer
//!
//! ## Example
//!
//! ```ignore
//! use octomarket_runtime::Store;
//!
//! let store = Store::new(FormState::login(), LoginReducer::new(), environment);
//!
//! store.send(FormAction::Submit).await?;
//! let status = store.state(|s| s.status).await;
//!
//! // Screen unmounted: nothing scheduled by this screen may fire afterwards
//! store.teardown();
//! ```

use octomarket_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// A task join error occurred while waiting on an effect
        ///
        /// This typically means a spawned task panicked.
        #[error("Task failed during effect execution: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),

        /// Store is torn down or shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after teardown.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;
pub use store::Store;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Cancelled effects count as complete.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(FormAction::Submit).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and the tracking side used during execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Number of effects started by the action that are still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
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
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed or aborted)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Aborting a task drops its future, so the counter is decremented for
/// cancelled effects too.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Internal: In-flight effect tasks, keyed by a registry-local sequence number
#[derive(Default)]
struct TaskRegistry {
    next_key: AtomicU64,
    tasks: Mutex<HashMap<u64, RegisteredTask>>,
}

struct RegisteredTask {
    cancel_id: Option<EffectId>,
    abort: AbortHandle,
}

impl TaskRegistry {
    /// Spawn `fut` and register it under `cancel_id`
    ///
    /// The registry lock is held across spawn and insert so the task's own
    /// removal cannot run before the entry exists.
    fn spawn<F>(self: &Arc<Self>, cancel_id: Option<EffectId>, fut: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(self);

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = tokio::spawn(async move {
            fut.await;
            registry.remove(key);
        });
        tasks.insert(
            key,
            RegisteredTask {
                cancel_id,
                abort: handle.abort_handle(),
            },
        );
    }

    fn remove(&self, key: u64) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
    }

    /// Abort every task registered under `id`, returning how many were aborted
    fn cancel(&self, id: EffectId) -> usize {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let keys: Vec<u64> = tasks
            .iter()
            .filter(|(_, task)| task.cancel_id == Some(id))
            .map(|(key, _)| *key)
            .collect();

        for key in &keys {
            if let Some(task) = tasks.remove(key) {
                task.abort.abort();
            }
        }
        keys.len()
    }

    /// Abort every registered task, returning how many were aborted
    fn cancel_all(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let count = tasks.len();
        for (_, task) in tasks.drain() {
            task.abort.abort();
        }
        count
    }

    fn len(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn len_for(&self, id: EffectId) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|task| task.cancel_id == Some(id))
            .count()
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, Duration, Effect, EffectHandle, EffectId, EffectTracking, DecrementGuard,
        Ordering, Reducer, RwLock, StoreError, TaskRegistry, broadcast, watch,
    };
    use std::sync::atomic::AtomicUsize;

    /// The Store - runtime coordinator for one screen's reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (flow logic)
    /// 3. Environment (injected ports)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// A Store lives exactly as long as the screen it backs. Call
    /// [`Store::teardown`] when the screen goes away; every timer it scheduled
    /// is aborted and further actions are rejected.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        tasks: Arc<TaskRegistry>,
        /// Actions produced by effects (timer expiries, future results) are
        /// broadcast here before being fed back into the reducer.
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
                tasks: Arc::new(TaskRegistry::default()),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects
        ///
        /// `send()` returns after starting effect execution, not completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store was torn down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, None, &tracking);
            }

            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let visible = store.state(|s| s.notice.visible).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Number of effect tasks currently in flight
        #[must_use]
        pub fn in_flight(&self) -> usize {
            self.tasks.len()
        }

        /// Number of effect tasks currently in flight under `id`
        #[must_use]
        pub fn in_flight_for(&self, id: EffectId) -> usize {
            self.tasks.len_for(id)
        }

        /// Returns `true` once the store has been torn down or shut down
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Tear the store down: reject further actions and abort every in-flight effect
        ///
        /// Returns the number of effects that were aborted. Aborted timers never
        /// dispatch their action.
        pub fn teardown(&self) -> usize {
            self.shutdown.store(true, Ordering::Release);
            let aborted = self.tasks.cancel_all();
            tracing::debug!(aborted, "Store torn down");
            metrics::counter!("store.effects.cancelled").increment(aborted as u64);
            aborted
        }

        /// Gracefully shut the store down, waiting for in-flight effects
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete. The remaining effects are aborted.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = tokio::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.tasks.len();
                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    self.tasks.cancel_all();
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute an effect
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        /// - `Cancellable`: Cancels the id's in-flight effects, then runs the inner effect under it
        /// - `Cancel`: Aborts the id's in-flight effects
        ///
        /// Effect failures never halt the store; reducer panics propagate.
        fn execute_effect(&self, effect: Effect<A>, cancel_id: Option<EffectId>, tracking: &EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();
                    let guard = DecrementGuard(tracking.clone());
                    let store = self.clone();

                    self.tasks.spawn(cancel_id, async move {
                        let _guard = guard;
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    tracking.increment();
                    let guard = DecrementGuard(tracking.clone());
                    let store = self.clone();

                    self.tasks.spawn(cancel_id, async move {
                        let _guard = guard;
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, cancel_id, tracking);
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                    tracking.increment();
                    let guard = DecrementGuard(tracking.clone());
                    let store = self.clone();

                    self.tasks.spawn(cancel_id, async move {
                        let _guard = guard;
                        for effect in effects {
                            let (sub_tx, mut sub_rx) = watch::channel(());
                            let sub_tracking = EffectTracking {
                                counter: Arc::new(AtomicUsize::new(0)),
                                notifier: sub_tx,
                            };

                            store.execute_effect(effect, cancel_id, &sub_tracking);

                            while sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                if sub_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        }
                    });
                },
                Effect::Cancellable { id, effect } => {
                    let aborted = self.tasks.cancel(id);
                    if aborted > 0 {
                        tracing::trace!(%id, aborted, "Superseded in-flight effects");
                        metrics::counter!("store.effects.cancelled").increment(aborted as u64);
                    }
                    self.execute_effect(*effect, Some(id), tracking);
                },
                Effect::Cancel(id) => {
                    let aborted = self.tasks.cancel(id);
                    tracing::trace!(%id, aborted, "Cancelled in-flight effects");
                    metrics::counter!("store.effects.cancelled").increment(aborted as u64);
                },
            }
        }

        /// Broadcast an effect-produced action and feed it back into the reducer
        async fn feed_back(&self, action: A)
        where
            R: Clone,
            E: Clone,
        {
            let _ = self.action_broadcast.send(action.clone());
            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped effect action");
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
                tasks: Arc::clone(&self.tasks),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}
