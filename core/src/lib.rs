//! # OctoMarket Core
//!
//! Core traits and types for the OctoMarket client flows.
//!
//! Every interactive flow (sign-in forms, code entry, the launch gate, the
//! transient notice banner) is written as a reducer: a pure function that
//! mutates its state and returns descriptions of side effects. The runtime
//! crate executes those descriptions.
//!
//! ## Core Concepts
//!
//! - **State**: Owned data for one screen instance
//! - **Action**: Every input to a reducer (user events, timer expiries, results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution), including timers
//! - **Environment**: Injected ports (storage, navigation, focus, clock)
//!
//! ## Example
//!
//! ```ignore
//! use octomarket_core::*;
//!
//! impl Reducer for BannerReducer {
//!     type State = BannerState;
//!     type Action = BannerAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BannerState,
//!         action: BannerAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<BannerAction>; 4]> {
//!         match action {
//!             BannerAction::Show => {
//!                 state.visible = true;
//!                 smallvec![Effect::Delay {
//!                     duration: Duration::from_millis(1800),
//!                     action: Box::new(BannerAction::Hide),
//!                 }]
//!             }
//!             BannerAction::Hide => {
//!                 state.visible = false;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer composition utilities
pub mod composition;

/// Reducer module - The core trait for flow logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all flow logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for flow logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
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
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime
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
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::time::Duration;

    /// Identifier grouping in-flight effects so they can be cancelled together
    ///
    /// A screen typically owns one id per timer it runs (`"notice.dismiss"`,
    /// `"form.submit"`, ...).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create an effect id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The name this id was created with
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, auto-dismiss, cooldown ticks)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` under `id`, cancelling anything still in flight under the same id
        Cancellable {
            /// Cancellation group
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },

        /// Abort every in-flight effect registered under the id
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
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
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
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap this effect so it runs under a cancellation id
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Returns `true` for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Lift this effect into another action type
        ///
        /// Used when a child reducer (for example the notice banner) is embedded
        /// in a screen reducer: every action the child effect produces is wrapped
        /// into the parent's action type.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            Action: 'static,
            B: 'static,
            F: Fn(Action) -> B + Send + Sync + 'static,
        {
            self.map_shared(&Arc::new(f))
        }

        fn map_shared<B, F>(self, f: &Arc<F>) -> Effect<B>
        where
            Action: 'static,
            B: 'static,
            F: Fn(Action) -> B + Send + Sync + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new((**f)(*action)),
                },
                Effect::Future(fut) => {
                    let f = Arc::clone(f);
                    Effect::Future(Box::pin(async move { fut.await.map(|action| (*f)(action)) }))
                },
                Effect::Cancellable { id, effect } => Effect::Cancellable {
                    id,
                    effect: Box::new(effect.map_shared(f)),
                },
                Effect::Cancel(id) => Effect::Cancel(id),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// External dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Child {
        Tick(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn map_wraps_delayed_action() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(10),
            action: Box::new(Child::Tick(1)),
        }
        .cancellable(EffectId::new("tick"));

        match effect.map(Parent::Child) {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id.as_str(), "tick");
                match *effect {
                    Effect::Delay { action, .. } => {
                        assert_eq!(*action, Parent::Child(Child::Tick(1)));
                    },
                    other => panic!("unexpected effect: {other:?}"),
                }
            },
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[tokio::test]
    async fn map_wraps_future_output() {
        let effect: Effect<Child> = Effect::Future(Box::pin(async { Some(Child::Tick(7)) }));

        let Effect::Future(fut) = effect.map(Parent::Child) else {
            panic!("expected a future");
        };
        assert_eq!(fut.await, Some(Parent::Child(Child::Tick(7))));
    }

    #[test]
    fn cancel_survives_map() {
        let effect: Effect<Child> = Effect::Cancel(EffectId::new("notice"));
        assert!(matches!(effect.map(Parent::Child), Effect::Cancel(id) if id == EffectId::new("notice")));
    }
}
