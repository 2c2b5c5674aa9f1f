//! Landing screen reducer: two buttons, two routes.

use super::navigate;
use crate::actions::LandingAction;
use crate::environment::FlowEnvironment;
use crate::providers::{FocusRequester, KeyValueStore, Navigator};
use crate::state::{LandingState, Navigation, Route};
use octomarket_core::effect::Effect;
use octomarket_core::environment::Clock;
use octomarket_core::reducer::Reducer;
use octomarket_core::{SmallVec, smallvec};

/// Landing screen reducer.
#[derive(Debug, Clone)]
pub struct LandingReducer<S, N, F, C> {
    _phantom: std::marker::PhantomData<(S, N, F, C)>,
}

impl<S, N, F, C> LandingReducer<S, N, F, C> {
    /// Create a new landing reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, N, F, C> Default for LandingReducer<S, N, F, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N, F, C> Reducer for LandingReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = LandingState;
    type Action = LandingAction;
    type Environment = FlowEnvironment<S, N, F, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let route = match action {
            LandingAction::GetStarted => Route::Signup,
            LandingAction::Login => Route::Login,
        };
        state.selected = Some(route);

        smallvec![navigate(&env.navigator, Navigation::replace(route))]
    }
}
