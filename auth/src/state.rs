//! Flow state types.
//!
//! One explicit state struct per screen, each with a single status or phase
//! enum. Every state is owned by exactly one screen instance and dropped with it.
//! All types are `Clone` to support the functional architecture pattern.

use crate::constants::{CODE_LENGTH, ONBOARDING_SLIDES};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

// ═══════════════════════════════════════════════════════════════════════
// Navigation
// ═══════════════════════════════════════════════════════════════════════

/// Named screens the flows can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/onboarding`
    Onboarding,
    /// `/landing`
    Landing,
    /// `/login`
    Login,
    /// `/signup`
    Signup,
    /// `/reset-password`
    ResetPassword,
    /// `/verify-code`
    VerifyCode,
    /// `/verify-reset-code`
    VerifyResetCode,
    /// `/create-new-password`
    CreateNewPassword,
    /// `/(tabs)/home`
    Home,
}

impl Route {
    /// The route's path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Onboarding => "/onboarding",
            Self::Landing => "/landing",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::ResetPassword => "/reset-password",
            Self::VerifyCode => "/verify-code",
            Self::VerifyResetCode => "/verify-reset-code",
            Self::CreateNewPassword => "/create-new-password",
            Self::Home => "/(tabs)/home",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// How a transition affects the back stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Replace the current screen (no back-stack entry).
    Replace,
    /// Push onto the back stack so back-navigation returns here.
    Push,
}

/// A route transition, carrying at most an email address forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Target route.
    pub route: Route,
    /// Back-stack behavior.
    pub mode: NavigationMode,
    /// Email handed to the next screen.
    pub email: Option<String>,
}

impl Navigation {
    /// Replace the current screen with `route`.
    #[must_use]
    pub const fn replace(route: Route) -> Self {
        Self {
            route,
            mode: NavigationMode::Replace,
            email: None,
        }
    }

    /// Push `route` onto the back stack.
    #[must_use]
    pub const fn push(route: Route) -> Self {
        Self {
            route,
            mode: NavigationMode::Push,
            email: None,
        }
    }

    /// Carry `email` to the next screen.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Transient Notice
// ═══════════════════════════════════════════════════════════════════════

/// Notice flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeKind {
    /// Green banner.
    #[default]
    Success,
    /// Red banner.
    Error,
}

/// Single-slot transient banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoticeState {
    /// Text shown in the banner.
    pub message: String,
    /// Banner flavor.
    pub kind: NoticeKind,
    /// Whether the banner is on screen.
    pub visible: bool,
    /// Bumped by every `Show`; a dismissal timer only acts on its own generation.
    pub generation: u64,
    /// Handoff to run once the banner is dismissed.
    pub on_dismiss: Option<Navigation>,
}

// ═══════════════════════════════════════════════════════════════════════
// Forms
// ═══════════════════════════════════════════════════════════════════════

/// Which form a [`FormState`] backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Email and password login.
    Login,
    /// Account creation.
    Signup,
    /// Request a password reset link.
    ResetPassword,
    /// Choose a new password after a verified reset code.
    CreateNewPassword,
}

/// Form input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Email address.
    Email,
    /// Password.
    Password,
    /// Password confirmation.
    ConfirmPassword,
    /// Optional referral code.
    ReferralCode,
    /// Birthday as entered.
    Birthday,
}

impl Field {
    /// Whether the field is masked until revealed.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }
}

/// Field values; unset fields read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues(BTreeMap<Field, String>);

impl FormValues {
    /// Value of `field`, or `""` if never set.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        self.0.get(&field).map_or("", String::as_str)
    }

    /// Set `field` to `value`.
    pub fn set(&mut self, field: Field, value: String) {
        self.0.insert(field, value);
    }
}

/// Submission lifecycle of a form.
///
/// Within one attempt the status only moves forward:
/// `Idle → Validating → Submitting → {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Rules are being checked.
    Validating,
    /// Waiting on the simulated backend.
    Submitting,
    /// Backend accepted the submission.
    Succeeded,
    /// A rule failed or the backend rejected the submission.
    Failed,
}

/// State of one form screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Which form this is.
    pub kind: FormKind,
    /// Field values.
    pub values: FormValues,
    /// Fields the user has focused at least once.
    pub touched: BTreeSet<Field>,
    /// Field that currently has focus.
    pub focused: Option<Field>,
    /// Secret fields currently shown in clear text.
    pub revealed: BTreeSet<Field>,
    /// Submission lifecycle.
    pub status: FormStatus,
    /// Whole-form error, one message at a time.
    pub error_message: Option<String>,
    /// Bumped every time an error is set; an auto-clear only acts on its own generation.
    pub error_generation: u64,
    /// Whether every rule of the form passes for the current values.
    pub rules_pass: bool,
    /// Number of submissions that passed validation.
    pub attempt: u64,
    /// Email captured when the current attempt was submitted.
    pub submitted_email: Option<String>,
    /// When the current attempt was submitted.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Transient banner.
    pub notice: NoticeState,
}

impl FormState {
    /// Fresh form of the given kind.
    #[must_use]
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: FormValues::default(),
            touched: BTreeSet::new(),
            focused: None,
            revealed: BTreeSet::new(),
            status: FormStatus::Idle,
            error_message: None,
            error_generation: 0,
            rules_pass: false,
            attempt: 0,
            submitted_email: None,
            submitted_at: None,
            notice: NoticeState::default(),
        }
    }

    /// Fresh login form.
    #[must_use]
    pub fn login() -> Self {
        Self::new(FormKind::Login)
    }

    /// Fresh signup form.
    #[must_use]
    pub fn signup() -> Self {
        Self::new(FormKind::Signup)
    }

    /// Fresh reset-password form.
    #[must_use]
    pub fn reset_password() -> Self {
        Self::new(FormKind::ResetPassword)
    }

    /// Fresh new-password form. `email` is the address handed over by the
    /// reset-code screen.
    #[must_use]
    pub fn create_new_password(email: Option<String>) -> Self {
        let mut state = Self::new(FormKind::CreateNewPassword);
        if let Some(email) = email {
            state.values.set(Field::Email, email);
        }
        state
    }

    /// Value of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        self.values.get(field)
    }

    /// Whether the submit control is enabled: every rule passes and no
    /// submission is in flight.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.rules_pass && self.status != FormStatus::Submitting
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Verification Code Entry
// ═══════════════════════════════════════════════════════════════════════

/// What a verified code unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPurpose {
    /// Confirm the address of a new account.
    EmailConfirmation,
    /// Authorize choosing a new password.
    PasswordReset,
}

/// Code entry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationPhase {
    /// Some boxes are empty.
    #[default]
    Entering,
    /// Every box holds a digit.
    Complete,
    /// Waiting on the simulated backend.
    Verifying,
    /// Code accepted.
    Verified,
}

/// Four boxes, each empty or holding one ASCII digit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerificationCode([String; CODE_LENGTH]);

impl VerificationCode {
    /// The digit in box `index` (`""` if empty or out of range).
    #[must_use]
    pub fn digit(&self, index: usize) -> &str {
        self.0.get(index).map_or("", String::as_str)
    }

    /// Store `value` in box `index`. Out-of-range indexes are ignored.
    pub fn set(&mut self, index: usize, value: String) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }

    /// `true` iff all boxes are filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|digit| !digit.is_empty())
    }

    /// The boxes joined into one string.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.concat()
    }
}

/// State of one code entry screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationState {
    /// What the code unlocks.
    pub purpose: VerificationPurpose,
    /// Email handed over by the previous screen.
    pub email: Option<String>,
    /// Entered digits.
    pub code: VerificationCode,
    /// Entry lifecycle.
    pub phase: VerificationPhase,
    /// Box that currently has focus.
    pub focused_index: usize,
    /// Error shown under the boxes.
    pub error_message: Option<String>,
    /// Number of verifications sent to the backend.
    pub attempt: u64,
    /// Number of mismatched codes.
    pub rejections: u32,
    /// Seconds until resend is enabled again; `0` means enabled.
    pub resend_remaining: u32,
    /// Bumped by every resend; a cooldown tick only acts on its own generation.
    pub resend_generation: u64,
    /// Transient banner.
    pub notice: NoticeState,
}

impl VerificationState {
    /// Fresh code entry for `purpose`.
    #[must_use]
    pub fn new(purpose: VerificationPurpose, email: Option<String>) -> Self {
        Self {
            purpose,
            email,
            code: VerificationCode::default(),
            phase: VerificationPhase::Entering,
            focused_index: 0,
            error_message: None,
            attempt: 0,
            rejections: 0,
            resend_remaining: 0,
            resend_generation: 0,
            notice: NoticeState::default(),
        }
    }

    /// Whether the verify control is enabled.
    #[must_use]
    pub fn can_verify(&self) -> bool {
        self.phase == VerificationPhase::Complete
    }

    /// Whether the resend control is enabled.
    ///
    /// Disabled while cooling down and once the code is being verified or
    /// has been accepted.
    #[must_use]
    pub const fn can_resend(&self) -> bool {
        self.resend_remaining == 0
            && !matches!(
                self.phase,
                VerificationPhase::Verifying | VerificationPhase::Verified
            )
    }

    /// `true` after a mismatched code until the next edit.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.phase == VerificationPhase::Complete && self.error_message.is_some()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Launch Gate
// ═══════════════════════════════════════════════════════════════════════

/// Launch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchPhase {
    /// Nothing decided yet.
    #[default]
    Unknown,
    /// Splash shown, reading storage.
    Deciding,
    /// No launch flag: go to onboarding.
    FirstLaunch,
    /// Flag set, no session token: go to landing.
    ReturningNoSession,
    /// Flag set and a session token: go to the main tabs.
    ReturningWithSession,
}

impl LaunchPhase {
    /// Where the decided phase leads, if decided.
    #[must_use]
    pub const fn route(self) -> Option<Route> {
        match self {
            Self::Unknown | Self::Deciding => None,
            Self::FirstLaunch => Some(Route::Onboarding),
            Self::ReturningNoSession => Some(Route::Landing),
            Self::ReturningWithSession => Some(Route::Home),
        }
    }
}

/// State of the bootstrap screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchState {
    /// Current decision.
    pub phase: LaunchPhase,
    /// Bumped by every `Start`; a decision only lands for its own run.
    pub run: u64,
    /// When the last decision was made.
    pub decided_at: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════════════════════════════════
// Onboarding & Landing
// ═══════════════════════════════════════════════════════════════════════

/// State of the onboarding carousel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OnboardingState {
    /// Slide on screen.
    pub index: usize,
    /// Set once the last slide's button was pressed.
    pub transitioning: bool,
}

impl OnboardingState {
    /// Whether the last slide is on screen.
    #[must_use]
    pub const fn is_last_slide(&self) -> bool {
        self.index + 1 >= ONBOARDING_SLIDES
    }
}

/// State of the landing screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LandingState {
    /// Route the user picked, once picked.
    pub selected: Option<Route>,
}
