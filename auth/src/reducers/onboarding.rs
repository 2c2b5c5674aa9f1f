//! Onboarding carousel reducer.
//!
//! Three slides. "Next" advances; on the last slide it becomes "Get started",
//! which leaves for the landing route after a short exit delay. Swipes report
//! the settled slide through [`OnboardingAction::PageSettled`].

use super::navigate;
use crate::actions::OnboardingAction;
use crate::constants::ONBOARDING_SLIDES;
use crate::constants::effect_ids::ONBOARDING_EXIT;
use crate::environment::FlowEnvironment;
use crate::providers::{FocusRequester, KeyValueStore, Navigator};
use crate::state::{Navigation, OnboardingState, Route};
use octomarket_core::effect::Effect;
use octomarket_core::environment::Clock;
use octomarket_core::reducer::Reducer;
use octomarket_core::{SmallVec, smallvec};

/// Onboarding carousel reducer.
#[derive(Debug, Clone)]
pub struct OnboardingReducer<S, N, F, C> {
    _phantom: std::marker::PhantomData<(S, N, F, C)>,
}

impl<S, N, F, C> OnboardingReducer<S, N, F, C> {
    /// Create a new onboarding reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, N, F, C> Default for OnboardingReducer<S, N, F, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N, F, C> Reducer for OnboardingReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = OnboardingState;
    type Action = OnboardingAction;
    type Environment = FlowEnvironment<S, N, F, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            OnboardingAction::Next => {
                if state.transitioning {
                    return smallvec![Effect::None];
                }

                if !state.is_last_slide() {
                    state.index += 1;
                    tracing::trace!(index = state.index, "Onboarding advanced");
                    return smallvec![Effect::None];
                }

                state.transitioning = true;
                tracing::debug!("Onboarding finished");

                smallvec![
                    Effect::Delay {
                        duration: env.config.onboarding_exit_delay,
                        action: Box::new(OnboardingAction::ExitElapsed),
                    }
                    .cancellable(ONBOARDING_EXIT)
                ]
            },

            OnboardingAction::PageSettled(index) => {
                if index < ONBOARDING_SLIDES && !state.transitioning {
                    state.index = index;
                }
                smallvec![Effect::None]
            },

            OnboardingAction::ExitElapsed => {
                if !state.transitioning {
                    return smallvec![Effect::None];
                }
                smallvec![navigate(&env.navigator, Navigation::replace(Route::Landing))]
            },
        }
    }
}
