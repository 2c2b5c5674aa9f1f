//! Launch gate reducer.
//!
//! Shows the splash for a fixed delay, then reads the launch flag and session
//! token and replaces the splash with one of three routes:
//!
//! | Storage                          | Route          |
//! |----------------------------------|----------------|
//! | no launch flag                   | `/onboarding`  |
//! | flag, no (or empty) session      | `/landing`     |
//! | flag and a session token         | `/(tabs)/home` |
//! | unreadable or unwritable storage | `/landing`     |
//!
//! The flag is written during the first launch, before the decision lands.

use super::navigate;
use crate::actions::{LaunchAction, LaunchOutcome};
use crate::constants::effect_ids::LAUNCH_SPLASH;
use crate::constants::storage_keys;
use crate::environment::FlowEnvironment;
use crate::error::Result;
use crate::providers::{FocusRequester, KeyValueStore, Navigator};
use crate::state::{LaunchPhase, LaunchState, Navigation};
use octomarket_core::effect::Effect;
use octomarket_core::environment::Clock;
use octomarket_core::reducer::Reducer;
use octomarket_core::{SmallVec, smallvec};

/// Read the launch flag and session token, marking the install as launched.
async fn read_outcome<S: KeyValueStore>(storage: &S) -> Result<LaunchOutcome> {
    if storage.get(storage_keys::HAS_LAUNCHED).await?.is_none() {
        storage
            .set(storage_keys::HAS_LAUNCHED, storage_keys::LAUNCHED_VALUE)
            .await?;
        return Ok(LaunchOutcome {
            has_launched: false,
            has_session: false,
        });
    }

    let token = storage.get(storage_keys::USER_TOKEN).await?;
    Ok(LaunchOutcome {
        has_launched: true,
        has_session: token.is_some_and(|token| !token.is_empty()),
    })
}

const fn decide(outcome: Option<LaunchOutcome>) -> LaunchPhase {
    match outcome {
        Some(LaunchOutcome {
            has_launched: false,
            ..
        }) => LaunchPhase::FirstLaunch,
        Some(LaunchOutcome {
            has_session: true, ..
        }) => LaunchPhase::ReturningWithSession,
        _ => LaunchPhase::ReturningNoSession,
    }
}

/// Launch gate reducer.
#[derive(Debug, Clone)]
pub struct LaunchReducer<S, N, F, C> {
    _phantom: std::marker::PhantomData<(S, N, F, C)>,
}

impl<S, N, F, C> LaunchReducer<S, N, F, C> {
    /// Create a new launch reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, N, F, C> Default for LaunchReducer<S, N, F, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N, F, C> Reducer for LaunchReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = LaunchState;
    type Action = LaunchAction;
    type Environment = FlowEnvironment<S, N, F, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LaunchAction::Start => {
                state.run += 1;
                state.phase = LaunchPhase::Deciding;
                state.decided_at = None;

                tracing::debug!(run = state.run, "Splash shown");

                smallvec![
                    Effect::Delay {
                        duration: env.config.splash_delay,
                        action: Box::new(LaunchAction::SplashElapsed { run: state.run }),
                    }
                    .cancellable(LAUNCH_SPLASH)
                ]
            },

            LaunchAction::SplashElapsed { run } => {
                if run != state.run || state.phase != LaunchPhase::Deciding {
                    return smallvec![Effect::None];
                }

                let storage = env.storage.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    let outcome = match read_outcome(&storage).await {
                        Ok(outcome) => Some(outcome),
                        Err(error) => {
                            tracing::warn!(%error, "Launch storage unavailable, falling back to landing");
                            None
                        },
                    };
                    Some(LaunchAction::Decided { run, outcome })
                }))]
            },

            LaunchAction::Decided { run, outcome } => {
                if run != state.run || state.phase != LaunchPhase::Deciding {
                    tracing::trace!(run, current = state.run, "Stale launch decision ignored");
                    return smallvec![Effect::None];
                }

                state.phase = decide(outcome);
                state.decided_at = Some(env.clock.now());

                tracing::info!(phase = ?state.phase, "Launch decided");

                match state.phase.route() {
                    Some(route) => smallvec![navigate(&env.navigator, Navigation::replace(route))],
                    None => smallvec![Effect::None],
                }
            },
        }
    }
}
