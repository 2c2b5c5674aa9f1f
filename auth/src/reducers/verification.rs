//! Verification code entry reducer.
//!
//! # States
//!
//! ```text
//! Entering ──(4th digit)──▶ Complete ──Verify, match──▶ Verifying ──delay──▶ Verified
//!    ▲                        │  ▲
//!    └──(digit cleared)───────┘  └──Verify, mismatch: "Invalid code."
//! ```
//!
//! Input boxes accept only an empty string or a single ASCII digit; anything
//! else is dropped without an error. Focus follows typing forward and
//! backspacing backward through the [`FocusRequester`] port.
//!
//! The code is compared against a fixed stand-in value from the configuration.
//! It is a placeholder for a verification backend.

use super::{go_back, navigate, request_focus, NoticeReducer};
use crate::actions::{NoticeAction, VerificationAction};
use crate::constants::effect_ids::{VERIFY_RESEND, VERIFY_SUBMIT};
use crate::constants::{CODE_LENGTH, messages};
use crate::environment::FlowEnvironment;
use crate::error::FlowError;
use crate::providers::{FocusRequester, KeyValueStore, Navigator};
use crate::state::{
    Navigation, NoticeKind, NoticeState, Route, VerificationPhase, VerificationPurpose,
    VerificationState,
};
use crate::validation::is_code_digit;
use octomarket_core::composition::{ScopedReducer, scope_reducer};
use octomarket_core::effect::Effect;
use octomarket_core::environment::Clock;
use octomarket_core::reducer::Reducer;
use octomarket_core::{SmallVec, smallvec};
use std::time::Duration;

/// Resend cooldown tick interval.
const RESEND_TICK: Duration = Duration::from_secs(1);

type ScopedNotice<S, N, F, C> = ScopedReducer<
    VerificationState,
    NoticeState,
    VerificationAction,
    NoticeAction,
    FlowEnvironment<S, N, F, C>,
    NoticeReducer<S, N, F, C>,
>;

fn notice_state(state: &mut VerificationState) -> &mut NoticeState {
    &mut state.notice
}

fn notice_action(action: VerificationAction) -> Option<NoticeAction> {
    match action {
        VerificationAction::Notice(action) => Some(action),
        _ => None,
    }
}

fn resend_tick(generation: u64) -> Effect<VerificationAction> {
    Effect::Delay {
        duration: RESEND_TICK,
        action: Box::new(VerificationAction::ResendTick { generation }),
    }
    .cancellable(VERIFY_RESEND)
}

/// Verification code entry reducer.
#[derive(Debug, Clone)]
pub struct VerificationReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    notice: ScopedNotice<S, N, F, C>,
}

impl<S, N, F, C> VerificationReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Create a new verification reducer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notice: scope_reducer(
                NoticeReducer::new(),
                notice_state,
                notice_action,
                VerificationAction::Notice,
            ),
        }
    }

    fn show_notice(
        &self,
        state: &mut VerificationState,
        message: &str,
        kind: NoticeKind,
        on_dismiss: Option<Navigation>,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<VerificationAction>; 4]> {
        self.notice.reduce(
            state,
            VerificationAction::Notice(NoticeAction::Show {
                message: message.to_string(),
                kind,
                on_dismiss,
            }),
            env,
        )
    }

    fn set_digit(
        state: &mut VerificationState,
        index: usize,
        value: String,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<VerificationAction>; 4]> {
        if index >= CODE_LENGTH || !is_code_digit(&value) {
            tracing::trace!(index, "Code input dropped");
            return smallvec![Effect::None];
        }
        if matches!(
            state.phase,
            VerificationPhase::Verifying | VerificationPhase::Verified
        ) {
            return smallvec![Effect::None];
        }

        let filled = !value.is_empty();
        state.code.set(index, value);
        state.error_message = None;
        state.phase = if state.code.is_complete() {
            VerificationPhase::Complete
        } else {
            VerificationPhase::Entering
        };

        let next_focus = if filled && index + 1 < CODE_LENGTH {
            Some(index + 1)
        } else if !filled && index > 0 {
            Some(index - 1)
        } else {
            None
        };

        match next_focus {
            Some(next) => {
                state.focused_index = next;
                smallvec![request_focus(&env.focus, next)]
            },
            None => smallvec![Effect::None],
        }
    }

    fn verify(
        &self,
        state: &mut VerificationState,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<VerificationAction>; 4]> {
        if !state.can_verify() {
            tracing::debug!(phase = ?state.phase, "Verify ignored");
            return smallvec![Effect::None];
        }

        state.error_message = None;

        if state.code.joined() != env.config.expected_code {
            state.rejections += 1;
            state.error_message = Some(FlowError::InvalidCode.to_string());
            tracing::warn!(rejections = state.rejections, "Verification code rejected");
            return self.show_notice(state, messages::INVALID_CODE, NoticeKind::Error, None, env);
        }

        state.attempt += 1;
        state.phase = VerificationPhase::Verifying;
        tracing::debug!(attempt = state.attempt, "Verifying code");

        smallvec![
            Effect::Delay {
                duration: env.config.verify_delay,
                action: Box::new(VerificationAction::VerificationCompleted {
                    attempt: state.attempt,
                }),
            }
            .cancellable(VERIFY_SUBMIT)
        ]
    }

    fn complete(
        &self,
        state: &mut VerificationState,
        attempt: u64,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<VerificationAction>; 4]> {
        if state.phase != VerificationPhase::Verifying || attempt != state.attempt {
            tracing::trace!(attempt, current = state.attempt, "Stale verification result ignored");
            return smallvec![Effect::None];
        }

        state.phase = VerificationPhase::Verified;

        let (message, handoff) = match state.purpose {
            VerificationPurpose::EmailConfirmation => {
                (messages::EMAIL_VERIFIED, Navigation::replace(Route::Login))
            },
            VerificationPurpose::PasswordReset => {
                let navigation = Navigation::push(Route::CreateNewPassword);
                let navigation = match &state.email {
                    Some(email) => navigation.with_email(email.clone()),
                    None => navigation,
                };
                (messages::RESET_CODE_VERIFIED, navigation)
            },
        };

        tracing::info!(purpose = ?state.purpose, next = %handoff.route, "Code verified");
        self.show_notice(state, message, NoticeKind::Success, Some(handoff), env)
    }

    fn resend(
        &self,
        state: &mut VerificationState,
        env: &FlowEnvironment<S, N, F, C>,
    ) -> SmallVec<[Effect<VerificationAction>; 4]> {
        if !state.can_resend() {
            tracing::debug!(remaining = state.resend_remaining, phase = ?state.phase, "Resend ignored");
            return smallvec![Effect::None];
        }

        state.resend_remaining = env.config.resend_cooldown_secs;
        state.resend_generation = state.resend_generation.wrapping_add(1);
        tracing::debug!(cooldown = state.resend_remaining, "Verification code resent");

        let mut effects = self.show_notice(state, messages::CODE_RESENT, NoticeKind::Success, None, env);
        effects.push(resend_tick(state.resend_generation));
        effects
    }

    fn tick(state: &mut VerificationState, generation: u64) -> SmallVec<[Effect<VerificationAction>; 4]> {
        if generation != state.resend_generation || state.resend_remaining == 0 {
            return smallvec![Effect::None];
        }

        state.resend_remaining -= 1;
        if state.resend_remaining == 0 {
            tracing::debug!("Resend enabled");
            smallvec![Effect::None]
        } else {
            smallvec![resend_tick(generation)]
        }
    }
}

impl<S, N, F, C> Default for VerificationReducer<S, N, F, C>
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

impl<S, N, F, C> Reducer for VerificationReducer<S, N, F, C>
where
    S: KeyValueStore + Clone + 'static,
    N: Navigator + Clone + 'static,
    F: FocusRequester + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = VerificationState;
    type Action = VerificationAction;
    type Environment = FlowEnvironment<S, N, F, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            VerificationAction::SetDigit { index, value } => Self::set_digit(state, index, value, env),

            VerificationAction::Focus(index) => {
                if index < CODE_LENGTH {
                    state.focused_index = index;
                }
                smallvec![Effect::None]
            },

            VerificationAction::Verify => self.verify(state, env),

            VerificationAction::VerificationCompleted { attempt } => self.complete(state, attempt, env),

            VerificationAction::Resend => self.resend(state, env),

            VerificationAction::ResendTick { generation } => Self::tick(state, generation),

            VerificationAction::Back => smallvec![go_back(&env.navigator)],

            action @ VerificationAction::Notice(_) => self.notice.reduce(state, action, env),
        }
    }
}
