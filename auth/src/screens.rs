//! Screen stores.
//!
//! One [`Store`] per mounted screen. Dropping a screen means calling
//! [`Store::teardown`], which cancels every pending timer of that screen so
//! nothing fires into a screen that is gone.

use crate::actions::{
    FormAction, LandingAction, LaunchAction, OnboardingAction, VerificationAction,
};
use crate::environment::FlowEnvironment;
use crate::reducers::{
    FormReducer, LandingReducer, LaunchReducer, OnboardingReducer, VerificationReducer,
};
use crate::state::{
    FormState, LandingState, LaunchState, OnboardingState, VerificationPurpose, VerificationState,
};
use octomarket_runtime::Store;

/// Store for any of the four credential forms.
pub type FormStore<S, N, F, C> =
    Store<FormState, FormAction, FlowEnvironment<S, N, F, C>, FormReducer<S, N, F, C>>;

/// Store for a code entry screen.
pub type VerificationStore<S, N, F, C> = Store<
    VerificationState,
    VerificationAction,
    FlowEnvironment<S, N, F, C>,
    VerificationReducer<S, N, F, C>,
>;

/// Store for the launch gate.
pub type LaunchStore<S, N, F, C> =
    Store<LaunchState, LaunchAction, FlowEnvironment<S, N, F, C>, LaunchReducer<S, N, F, C>>;

/// Store for the onboarding carousel.
pub type OnboardingStore<S, N, F, C> = Store<
    OnboardingState,
    OnboardingAction,
    FlowEnvironment<S, N, F, C>,
    OnboardingReducer<S, N, F, C>,
>;

/// Store for the landing screen.
pub type LandingStore<S, N, F, C> =
    Store<LandingState, LandingAction, FlowEnvironment<S, N, F, C>, LandingReducer<S, N, F, C>>;

/// Mount a form screen with `state`.
#[must_use]
pub fn form<S, N, F, C>(state: FormState, env: FlowEnvironment<S, N, F, C>) -> FormStore<S, N, F, C>
where
    S: crate::providers::KeyValueStore + Clone + 'static,
    N: crate::providers::Navigator + Clone + 'static,
    F: crate::providers::FocusRequester + Clone + 'static,
    C: octomarket_core::environment::Clock + Clone + 'static,
{
    Store::new(state, FormReducer::new(), env)
}

macro_rules! screen {
    ($(#[$doc:meta])* $name:ident -> $store:ident, $state:expr, $reducer:ident) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name<S, N, F, C>(env: FlowEnvironment<S, N, F, C>) -> $store<S, N, F, C>
        where
            S: crate::providers::KeyValueStore + Clone + 'static,
            N: crate::providers::Navigator + Clone + 'static,
            F: crate::providers::FocusRequester + Clone + 'static,
            C: octomarket_core::environment::Clock + Clone + 'static,
        {
            Store::new($state, $reducer::new(), env)
        }
    };
}

screen!(
    /// Mount the login form.
    login -> FormStore, FormState::login(), FormReducer
);
screen!(
    /// Mount the signup form.
    signup -> FormStore, FormState::signup(), FormReducer
);
screen!(
    /// Mount the reset password form.
    reset_password -> FormStore, FormState::reset_password(), FormReducer
);
screen!(
    /// Mount the launch gate. Send [`LaunchAction::Start`] to run it.
    launch -> LaunchStore, LaunchState::default(), LaunchReducer
);
screen!(
    /// Mount the onboarding carousel.
    onboarding -> OnboardingStore, OnboardingState::default(), OnboardingReducer
);
screen!(
    /// Mount the landing screen.
    landing -> LandingStore, LandingState::default(), LandingReducer
);

/// Mount the create new password form for the account `email`.
#[must_use]
pub fn create_new_password<S, N, F, C>(
    email: Option<String>,
    env: FlowEnvironment<S, N, F, C>,
) -> FormStore<S, N, F, C>
where
    S: crate::providers::KeyValueStore + Clone + 'static,
    N: crate::providers::Navigator + Clone + 'static,
    F: crate::providers::FocusRequester + Clone + 'static,
    C: octomarket_core::environment::Clock + Clone + 'static,
{
    form(FormState::create_new_password(email), env)
}

/// Mount the signup confirmation code screen for `email`.
#[must_use]
pub fn verify_code<S, N, F, C>(
    email: Option<String>,
    env: FlowEnvironment<S, N, F, C>,
) -> VerificationStore<S, N, F, C>
where
    S: crate::providers::KeyValueStore + Clone + 'static,
    N: crate::providers::Navigator + Clone + 'static,
    F: crate::providers::FocusRequester + Clone + 'static,
    C: octomarket_core::environment::Clock + Clone + 'static,
{
    Store::new(
        VerificationState::new(VerificationPurpose::EmailConfirmation, email),
        VerificationReducer::new(),
        env,
    )
}

/// Mount the password reset code screen for `email`.
#[must_use]
pub fn verify_reset_code<S, N, F, C>(
    email: Option<String>,
    env: FlowEnvironment<S, N, F, C>,
) -> VerificationStore<S, N, F, C>
where
    S: crate::providers::KeyValueStore + Clone + 'static,
    N: crate::providers::Navigator + Clone + 'static,
    F: crate::providers::FocusRequester + Clone + 'static,
    C: octomarket_core::environment::Clock + Clone + 'static,
{
    Store::new(
        VerificationState::new(VerificationPurpose::PasswordReset, email),
        VerificationReducer::new(),
        env,
    )
}
