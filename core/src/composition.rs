//! Reducer composition utilities
//!
//! A screen reducer often embeds a smaller reducer that owns a slice of its
//! state, the way every sign-in screen embeds the transient notice banner.
//! [`scope_reducer`] lifts such a child reducer so it can be driven with the
//! parent's state and action types.
//!
//! # Examples
//!
//! ```
//! use octomarket_core::composition::scope_reducer;
//! use octomarket_core::effect::Effect;
//! use octomarket_core::reducer::Reducer;
//! use octomarket_core::{smallvec, SmallVec};
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
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
//!         state: &mut Self::State,
//!         action: Self::Action,
//!         _env: &Self::Environment,
//!     ) -> SmallVec<[Effect<Self::Action>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Default)]
//! struct ScreenState {
//!     counter: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ScreenAction {
//!     Counter(CounterAction),
//!     Other,
//! }
//!
//! let scoped = scope_reducer(
//!     CounterReducer,
//!     |screen: &mut ScreenState| &mut screen.counter,
//!     |action: ScreenAction| match action {
//!         ScreenAction::Counter(inner) => Some(inner),
//!         ScreenAction::Other => None,
//!     },
//!     ScreenAction::Counter,
//! );
//!
//! let mut state = ScreenState::default();
//! let _ = scoped.reduce(&mut state, ScreenAction::Counter(CounterAction::Increment), &());
//! assert_eq!(state.counter.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Scopes a child reducer to a slice of a parent state and a case of a parent action.
///
/// # Arguments
///
/// - `reducer`: The child reducer
/// - `state`: Projects the parent state onto the child's slice
/// - `extract`: Returns the child action if the parent action wraps one
/// - `embed`: Wraps child actions (produced by child effects) into parent actions
///
/// Parent actions that `extract` rejects produce no effects.
pub const fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
    }
}

/// A child reducer lifted into a parent's state and action types.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
}

impl<S, SubS, A, SubA, E, R> Clone for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
        }
    }
}

impl<S, SubS, A, SubA, E, R> std::fmt::Debug for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E> + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedReducer")
            .field("reducer", &self.reducer)
            .finish_non_exhaustive()
    }
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
    A: 'static,
    SubA: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let embed = self.embed;
        self.reducer
            .reduce((self.state)(state), child_action, env)
            .into_iter()
            .map(|effect| effect.map(embed))
            .collect()
    }
}
