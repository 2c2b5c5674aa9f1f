//! Flow reducers.
//!
//! This module contains pure reducer functions for every screen flow.
//!
//! Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
//! They never start timers or touch ports themselves; timers are returned as
//! `Effect::Delay` and port calls as `Effect::Future`.

pub mod form;
pub mod landing;
pub mod launch;
pub mod notice;
pub mod onboarding;
pub mod verification;

// Re-export
pub use form::FormReducer;
pub use landing::LandingReducer;
pub use launch::LaunchReducer;
pub use notice::NoticeReducer;
pub use onboarding::OnboardingReducer;
pub use verification::VerificationReducer;

use crate::providers::{FocusRequester, Navigator};
use crate::state::Navigation;
use octomarket_core::effect::Effect;

/// Effect that performs `navigation` through the navigator.
///
/// Navigation failures are logged; the flow stays where it is.
pub(crate) fn navigate<A, N>(navigator: &N, navigation: Navigation) -> Effect<A>
where
    A: Send + 'static,
    N: Navigator + Clone + 'static,
{
    let navigator = navigator.clone();
    Effect::Future(Box::pin(async move {
        let route = navigation.route;
        let mode = navigation.mode;
        match navigator.navigate(navigation).await {
            Ok(()) => tracing::info!(%route, ?mode, "Navigated"),
            Err(error) => tracing::warn!(%route, ?mode, %error, "Navigation failed"),
        }
        None
    }))
}

/// Effect that pops the current screen.
pub(crate) fn go_back<A, N>(navigator: &N) -> Effect<A>
where
    A: Send + 'static,
    N: Navigator + Clone + 'static,
{
    let navigator = navigator.clone();
    Effect::Future(Box::pin(async move {
        match navigator.back().await {
            Ok(()) => tracing::info!("Navigated back"),
            Err(error) => tracing::warn!(%error, "Back navigation failed"),
        }
        None
    }))
}

/// Effect that moves input focus to `index`.
pub(crate) fn request_focus<A, F>(focus: &F, index: usize) -> Effect<A>
where
    A: Send + 'static,
    F: FocusRequester + Clone + 'static,
{
    let focus = focus.clone();
    Effect::Future(Box::pin(async move {
        focus.request_focus(index);
        None
    }))
}
