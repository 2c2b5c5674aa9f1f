//! Form reducer.
//!
//! Drives the login, signup, reset-password and new-password forms.
//!
//! # Flow
//!
//! 1. User edits fields (`SetField` clears the whole-form error)
//! 2. `Submit` runs the form's rules in order; the first failure is shown
//! 3. All rules pass: status becomes `Submitting` and the simulated backend
//!    delay starts
//! 4. `SubmissionCompleted` resolves the attempt:
//!    - Login always fails with "account not found"
//!    - The other forms succeed, show a success notice and hand off to the
//!      next screen once the notice is dismissed
//!
//! `Submit` while `Submitting` is a no-op, so rapid repeated taps cannot start
//! a second delay.
//!
//! An error left on a form whose rules all pass (the login "account not found"
//! answer) clears itself after `error_clear_delay`. The timer carries the error
//! generation it was scheduled for and is ignored once a newer error is set.

use super::{go_back, navigate, NoticeReducer};
use crate::actions::{FormAction, NoticeAction};
use crate::constants::effect_ids::{FORM_ERROR_CLEAR, FORM_SUBMIT};
use crate::constants::messages;
use crate::environment::FlowEnvironment;
use crate::error::FlowError;
use crate::providers::{FocusRequester, KeyValueStore, Navigator};
use crate::state::{Field, FormKind, FormState, FormStatus, Navigation, NoticeKind, NoticeState, Route};
use crate::validation::validate_form;
use octomarket_core::composition::{ScopedReducer, scope_reducer};
use octomarket_core::effect::Effect;
use octomarket_core::environment::Clock;
use octomarket_core::reducer::Reducer;
use octomarket_core::{SmallVec, smallvec};

type ScopedNotice<S, N, F, C> = ScopedReducer<
    FormState,
    NoticeState,
    FormAction,
    NoticeAction,
    FlowEnvironment<S, N, F, C>,
    NoticeReducer<S, N, F, C>,
>;

fn notice_state(state: &mut FormState) -> &mut NoticeState {
    &mut state.notice
}

fn notice_action(action: FormAction) -> Option<NoticeAction> {
    match action {
        FormAction::Notice(action) => Some(action),
        _ => None,
    }
}

/// Success message and follow-up screen of a form that resolved successfully.
fn success_outcome(kind: FormKind, email: Option<&str>) -> Option<(&'static str, Navigation)> {
    let with_email = |navigation: Navigation| match email {
        Some(email) => navigation.with_email(email),
        None => navigation,
    };

    match kind {
        FormKind::Login => None,
        FormKind::Signup => Some((
            messages::SIGNUP_SUCCESS,
            with_email(Navigation::push(Route::VerifyCode)),
        )),
        FormKind::ResetPassword => Some((
            messages::RESET_LINK_SENT,
            with_email(Navigation::push(Route::VerifyResetCode)),
        )),
        FormKind::CreateNewPassword => Some((
            messages::PASSWORD_RESET,
            Navigation::replace(Route::Login),
        )),
    }
}

/// Form reducer.
///
/// One reducer serves every [`FormKind`]; the state's kind selects the rules,
/// delay and outcome.
#[derive(Debug, Clone)]
pub struct FormReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    notice: ScopedNotice<S, N, F, C>,
}

impl<S, N, F, C> FormReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Create a new form reducer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notice: scope_reducer(
                NoticeReducer::new(),
                notice_state,
                notice_action,
                FormAction::Notice,
            ),
        }
    }

    fn set_error(
        state: &mut FormState,
        message: String,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<FormAction>; 4]> {
        state.error_message = Some(message);
        state.error_generation = state.error_generation.wrapping_add(1);

        if !state.rules_pass {
            return smallvec![Effect::None];
        }

        smallvec![
            Effect::Delay {
                duration: env.config.error_clear_delay,
                action: Box::new(FormAction::ErrorCleared {
                    generation: state.error_generation,
                }),
            }
            .cancellable(FORM_ERROR_CLEAR)
        ]
    }

    fn submit(
        state: &mut FormState,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<FormAction>; 4]> {
        if state.status == FormStatus::Submitting {
            tracing::debug!(kind = ?state.kind, "Submit ignored: submission in flight");
            return smallvec![Effect::None];
        }

        state.status = FormStatus::Validating;
        state.error_message = None;

        let checked = validate_form(state.kind, &state.values, env.password_policy());
        state.rules_pass = checked.is_ok();
        if let Err(error) = checked {
            tracing::warn!(kind = ?state.kind, %error, "Submission rejected");
            state.status = FormStatus::Failed;
            return Self::set_error(state, error.to_string(), env);
        }

        state.attempt += 1;
        state.status = FormStatus::Submitting;
        state.submitted_at = Some(env.clock.now());
        let email = state.value(Field::Email).trim();
        state.submitted_email = (!email.is_empty()).then(|| email.to_string());

        let delay = match state.kind {
            FormKind::Login => env.config.login_delay,
            FormKind::Signup | FormKind::ResetPassword | FormKind::CreateNewPassword => {
                env.config.submit_delay
            },
        };

        tracing::debug!(kind = ?state.kind, attempt = state.attempt, ?delay, "Submitting");

        smallvec![
            Effect::Delay {
                duration: delay,
                action: Box::new(FormAction::SubmissionCompleted {
                    attempt: state.attempt,
                }),
            }
            .cancellable(FORM_SUBMIT)
        ]
    }

    fn complete(
        &self,
        state: &mut FormState,
        attempt: u64,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<FormAction>; 4]> {
        if state.status != FormStatus::Submitting || attempt != state.attempt {
            tracing::trace!(attempt, current = state.attempt, "Stale submission result ignored");
            return smallvec![Effect::None];
        }

        match success_outcome(state.kind, state.submitted_email.as_deref()) {
            None => {
                state.status = FormStatus::Failed;
                tracing::warn!(kind = ?state.kind, attempt, "Submission failed: account not found");
                Self::set_error(state, FlowError::AccountNotFound.to_string(), env)
            },
            Some((message, handoff)) => {
                state.status = FormStatus::Succeeded;
                tracing::info!(kind = ?state.kind, attempt, next = %handoff.route, "Submission succeeded");
                self.notice.reduce(
                    state,
                    FormAction::Notice(NoticeAction::Show {
                        message: message.to_string(),
                        kind: NoticeKind::Success,
                        on_dismiss: Some(handoff),
                    }),
                    env,
                )
            },
        }
    }
}

impl<S, N, F, C> Default for FormReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N, F, C> Reducer for FormReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = FormState;
    type Action = FormAction;
    type Environment = FlowEnvironment<S, N, F, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Input
            // ═══════════════════════════════════════════════════════════════
            FormAction::SetField { field, value } => {
                state.values.set(field, value);
                state.error_message = None;
                state.rules_pass =
                    validate_form(state.kind, &state.values, env.password_policy()).is_ok();
                smallvec![Effect::None]
            },

            FormAction::Focus(field) => {
                state.focused = Some(field);
                state.touched.insert(field);
                smallvec![Effect::None]
            },

            FormAction::Blur(field) => {
                if state.focused == Some(field) {
                    state.focused = None;
                }
                smallvec![Effect::None]
            },

            FormAction::ToggleReveal(field) => {
                if field.is_secret() && !state.revealed.remove(&field) {
                    state.revealed.insert(field);
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Submission
            // ═══════════════════════════════════════════════════════════════
            FormAction::Submit => Self::submit(state, env),

            FormAction::SubmissionCompleted { attempt } => self.complete(state, attempt, env),

            FormAction::ErrorCleared { generation } => {
                if generation != state.error_generation || !state.rules_pass {
                    tracing::trace!(generation, current = state.error_generation, "Stale error clear ignored");
                    return smallvec![Effect::None];
                }
                state.error_message = None;
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Navigation
            // ═══════════════════════════════════════════════════════════════
            FormAction::Back => smallvec![go_back(&env.navigator)],

            FormAction::ForgotPassword if state.kind == FormKind::Login => {
                smallvec![navigate(&env.navigator, Navigation::push(Route::ResetPassword))]
            },

            FormAction::GoToSignup if state.kind == FormKind::Login => {
                smallvec![navigate(&env.navigator, Navigation::replace(Route::Signup))]
            },

            FormAction::ForgotPassword | FormAction::GoToSignup => {
                tracing::debug!(kind = ?state.kind, "Login link ignored on this form");
                smallvec![Effect::None]
            },

            action @ FormAction::Notice(_) => self.notice.reduce(state, action, env),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::constants::effect_ids::NOTICE_DISMISS;
    use crate::environment::MockEnvironment;
    use crate::mocks::{InMemoryKeyValueStore, RecordingFocus, RecordingNavigator};
    use octomarket_core::environment::SystemClock;
    use octomarket_testing::{ReducerTest, assertions};
    use std::time::Duration;

    type TestReducer =
        FormReducer<InMemoryKeyValueStore, RecordingNavigator, RecordingFocus, SystemClock>;

    fn set(field: Field, value: &str) -> FormAction {
        FormAction::SetField {
            field,
            value: value.to_string(),
        }
    }

    fn valid_login() -> Vec<FormAction> {
        vec![set(Field::Email, "jane@market.io"), set(Field::Password, "hunter22")]
    }

    #[test]
    fn test_empty_login_reports_email_required() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_action(FormAction::Submit)
            .then_state(|state| {
                assert_eq!(state.status, FormStatus::Failed);
                assert_eq!(state.error_message.as_deref(), Some("Email is required."));
                assert_eq!(state.attempt, 0);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_editing_clears_error() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions([FormAction::Submit, set(Field::Email, "j")])
            .then_state(|state| assert_eq!(state.error_message, None))
            .run();
    }

    #[test]
    fn test_valid_login_starts_submission() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions(valid_login())
            .when_action(FormAction::Submit)
            .then_state(|state| {
                assert_eq!(state.status, FormStatus::Submitting);
                assert_eq!(state.attempt, 1);
                assert_eq!(state.submitted_email.as_deref(), Some("jane@market.io"));
                assert!(!state.can_submit());
            })
            .then_effects(|effects| {
                let delays = assertions::delayed_actions(effects);
                assert_eq!(delays.len(), 1);
                assert_eq!(delays[0].0, Some(FORM_SUBMIT));
                assert_eq!(delays[0].1, Duration::from_millis(2000));
            })
            .run();
    }

    #[test]
    fn test_submit_while_submitting_is_noop() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions(valid_login())
            .when_actions([FormAction::Submit, FormAction::Submit])
            .then_state(|state| {
                assert_eq!(state.attempt, 1);
                assert_eq!(state.status, FormStatus::Submitting);
                assert_eq!(state.value(Field::Email), "jane@market.io");
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_login_always_fails_after_delay() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions(valid_login())
            .when_actions([FormAction::Submit, FormAction::SubmissionCompleted { attempt: 1 }])
            .then_state(|state| {
                assert_eq!(state.status, FormStatus::Failed);
                assert_eq!(state.error_message.as_deref(), Some(messages::ACCOUNT_NOT_FOUND));
                assert!(state.can_submit());
                assert!(!state.notice.visible);
            })
            .run();
    }

    #[test]
    fn test_login_failure_schedules_error_clear() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions(valid_login())
            .when_actions([FormAction::Submit, FormAction::SubmissionCompleted { attempt: 1 }])
            .then_state(|state| assert_eq!(state.error_generation, 1))
            .then_effects(|effects| {
                let delays = assertions::delayed_actions(effects);
                assert_eq!(delays.len(), 1);
                assert_eq!(delays[0].0, Some(FORM_ERROR_CLEAR));
                assert_eq!(delays[0].1, Duration::from_millis(2000));
                assert_eq!(*delays[0].2, FormAction::ErrorCleared { generation: 1 });
            })
            .run();
    }

    #[test]
    fn test_error_clear_removes_lingering_error() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions(valid_login())
            .when_actions([
                FormAction::Submit,
                FormAction::SubmissionCompleted { attempt: 1 },
                FormAction::ErrorCleared { generation: 1 },
            ])
            .then_state(|state| {
                assert_eq!(state.error_message, None);
                assert_eq!(state.status, FormStatus::Failed);
            })
            .run();
    }

    #[test]
    fn test_stale_error_clear_keeps_newer_error() {
        let mut state = FormState::login();
        state.rules_pass = true;
        state.error_message = Some(messages::ACCOUNT_NOT_FOUND.to_string());
        state.error_generation = 3;

        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(state)
            .when_action(FormAction::ErrorCleared { generation: 2 })
            .then_state(|state| {
                assert_eq!(state.error_message.as_deref(), Some(messages::ACCOUNT_NOT_FOUND));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_rule_failure_never_schedules_clear() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions([set(Field::Email, "jane@market"), FormAction::Submit])
            .then_state(|state| {
                assert!(!state.rules_pass);
                assert_eq!(state.error_generation, 1);
            })
            .then_effects(|effects| assert!(assertions::delayed_actions(effects).is_empty()))
            .run();
    }

    #[test]
    fn test_submit_enabled_only_when_rules_pass() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions([set(Field::Email, "jane@market.io"), set(Field::Password, "short1")])
            .then_state(|state| assert!(!state.can_submit()))
            .run();

        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions(valid_login())
            .then_state(|state| assert!(state.can_submit()))
            .run();
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions(valid_login())
            .when_actions([FormAction::Submit, FormAction::SubmissionCompleted { attempt: 7 }])
            .then_state(|state| assert_eq!(state.status, FormStatus::Submitting))
            .run();
    }

    #[test]
    fn test_reset_success_shows_notice_with_handoff() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::reset_password())
            .when_actions([
                set(Field::Email, " jane@market.io "),
                FormAction::Submit,
                FormAction::SubmissionCompleted { attempt: 1 },
            ])
            .then_state(|state| {
                assert_eq!(state.status, FormStatus::Succeeded);
                assert!(state.notice.visible);
                assert_eq!(state.notice.message, messages::RESET_LINK_SENT);
                assert_eq!(
                    state.notice.on_dismiss,
                    Some(Navigation::push(Route::VerifyResetCode).with_email("jane@market.io"))
                );
            })
            .then_effects(|effects| {
                let delays = assertions::delayed_actions(effects);
                assert_eq!(delays[0].0, Some(NOTICE_DISMISS));
                assert_eq!(
                    *delays[0].2,
                    FormAction::Notice(NoticeAction::Expired { generation: 1 })
                );
            })
            .run();
    }

    #[test]
    fn test_new_password_hands_off_to_login() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::create_new_password(Some("jane@market.io".into())))
            .when_actions([
                set(Field::Password, "newpass99"),
                set(Field::ConfirmPassword, "newpass99"),
                FormAction::Submit,
                FormAction::SubmissionCompleted { attempt: 1 },
            ])
            .then_state(|state| {
                assert_eq!(state.notice.message, messages::PASSWORD_RESET);
                assert_eq!(state.notice.on_dismiss, Some(Navigation::replace(Route::Login)));
            })
            .run();
    }

    #[test]
    fn test_toggle_reveal_only_for_secrets() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::signup())
            .when_actions([
                FormAction::ToggleReveal(Field::Password),
                FormAction::ToggleReveal(Field::Email),
                FormAction::ToggleReveal(Field::ConfirmPassword),
                FormAction::ToggleReveal(Field::ConfirmPassword),
            ])
            .then_state(|state| {
                assert!(state.revealed.contains(&Field::Password));
                assert!(!state.revealed.contains(&Field::Email));
                assert!(!state.revealed.contains(&Field::ConfirmPassword));
            })
            .run();
    }

    #[test]
    fn test_focus_and_blur() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_actions([FormAction::Focus(Field::Email), FormAction::Blur(Field::Email)])
            .then_state(|state| {
                assert_eq!(state.focused, None);
                assert!(state.touched.contains(&Field::Email));
            })
            .run();
    }

    #[test]
    fn test_login_links_only_on_login_form() {
        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::login())
            .when_action(FormAction::ForgotPassword)
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();

        ReducerTest::new(TestReducer::new())
            .with_env(MockEnvironment::in_memory())
            .given_state(FormState::signup())
            .when_action(FormAction::GoToSignup)
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_account_not_found_message_matches_constant() {
        assert_eq!(FlowError::AccountNotFound.to_string(), messages::ACCOUNT_NOT_FOUND);
    }
}
