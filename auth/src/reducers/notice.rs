//! Transient notice reducer.
//!
//! A single-slot banner with a fixed display duration. Showing a banner while
//! another is visible replaces it: the new dismissal timer runs under the same
//! cancellation id, which cancels the old one. Every timer also carries the
//! generation it was scheduled for; an expiry for an older generation is ignored.
//!
//! The notice is embedded in each screen's state and driven through
//! [`scope_reducer`](octomarket_core::composition::scope_reducer).

use super::navigate;
use crate::actions::NoticeAction;
use crate::constants::effect_ids::NOTICE_DISMISS;
use crate::environment::FlowEnvironment;
use crate::providers::{FocusRequester, KeyValueStore, Navigator};
use crate::state::NoticeState;
use octomarket_core::effect::Effect;
use octomarket_core::environment::Clock;
use octomarket_core::reducer::Reducer;
use octomarket_core::{SmallVec, smallvec};

/// Transient notice reducer.
#[derive(Debug, Clone)]
pub struct NoticeReducer<S, N, F, C> {
    _phantom: std::marker::PhantomData<(S, N, F, C)>,
}

impl<S, N, F, C> NoticeReducer<S, N, F, C> {
    /// Create a new notice reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, N, F, C> Default for NoticeReducer<S, N, F, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N, F, C> NoticeReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Hide the banner and hand off to `on_dismiss`, if any.
    fn hide(state: &mut NoticeState, env: &FlowEnvironment<S, N, F, C>) -> Effect<NoticeAction> {
        state.visible = false;
        tracing::debug!(generation = state.generation, "Notice dismissed");

        match state.on_dismiss.take() {
            Some(navigation) => navigate(&env.navigator, navigation),
            None => Effect::None,
        }
    }
}

impl<S, N, F, C> Reducer for NoticeReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = NoticeState;
    type Action = NoticeAction;
    type Environment = FlowEnvironment<S, N, F, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            NoticeAction::Show {
                message,
                kind,
                on_dismiss,
            } => {
                state.generation = state.generation.wrapping_add(1);
                state.message = message;
                state.kind = kind;
                state.visible = true;
                state.on_dismiss = on_dismiss;

                tracing::debug!(generation = state.generation, ?kind, "Notice shown");

                smallvec![
                    Effect::Delay {
                        duration: env.config.notice_duration,
                        action: Box::new(NoticeAction::Expired {
                            generation: state.generation,
                        }),
                    }
                    .cancellable(NOTICE_DISMISS)
                ]
            },

            NoticeAction::Expired { generation } => {
                if !state.visible || generation != state.generation {
                    tracing::trace!(generation, current = state.generation, "Stale notice expiry ignored");
                    return smallvec![Effect::None];
                }
                smallvec![Self::hide(state, env)]
            },

            NoticeAction::Dismiss => {
                if !state.visible {
                    return smallvec![Effect::None];
                }
                smallvec![Effect::Cancel(NOTICE_DISMISS), Self::hide(state, env)]
            },
        }
    }
}
