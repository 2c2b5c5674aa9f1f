//! Flow actions.
//!
//! Every input to a flow reducer is an action: user events from the screen
//! and the timer expiries the reducer scheduled itself. Timer actions carry the
//! generation or attempt number they were scheduled for, so a stale one is
//! recognised and ignored.

use crate::state::{Field, Navigation, NoticeKind};

/// Transient notice action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeAction {
    /// Show a banner, replacing any banner on screen.
    Show {
        /// Banner text.
        message: String,
        /// Banner flavor.
        kind: NoticeKind,
        /// Handoff to run once the banner is dismissed.
        on_dismiss: Option<Navigation>,
    },

    /// Hide the banner now (user tapped it).
    Dismiss,

    /// Auto-dismiss timer fired.
    Expired {
        /// Generation the timer was scheduled for.
        generation: u64,
    },
}

/// Form screen action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Input
    // ═══════════════════════════════════════════════════════════════════════
    /// User edited a field.
    SetField {
        /// Edited field.
        field: Field,
        /// New value.
        value: String,
    },

    /// Field gained focus.
    Focus(Field),

    /// Field lost focus.
    Blur(Field),

    /// Show or mask a secret field.
    ToggleReveal(Field),

    // ═══════════════════════════════════════════════════════════════════════
    // Submission
    // ═══════════════════════════════════════════════════════════════════════
    /// User pressed the submit control.
    Submit,

    /// Simulated backend answered.
    SubmissionCompleted {
        /// Attempt the answer belongs to.
        attempt: u64,
    },

    /// A lingering error on a valid form timed out.
    ErrorCleared {
        /// Error generation the timer was scheduled for.
        generation: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Navigation
    // ═══════════════════════════════════════════════════════════════════════
    /// Back arrow.
    Back,

    /// "Forgot password?" link on the login form.
    ForgotPassword,

    /// "Sign up" link on the login form.
    GoToSignup,

    /// Embedded notice.
    Notice(NoticeAction),
}

/// Code entry screen action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationAction {
    /// User typed into box `index`.
    SetDigit {
        /// Box index (0-based).
        index: usize,
        /// Raw input; anything but one digit or empty is dropped.
        value: String,
    },

    /// User tapped box `index`.
    Focus(usize),

    /// User pressed the verify control.
    Verify,

    /// Simulated backend answered.
    VerificationCompleted {
        /// Attempt the answer belongs to.
        attempt: u64,
    },

    /// User pressed the resend control.
    Resend,

    /// One second of resend cooldown elapsed.
    ResendTick {
        /// Cooldown generation the tick belongs to.
        generation: u64,
    },

    /// Back arrow.
    Back,

    /// Embedded notice.
    Notice(NoticeAction),
}

/// Launch gate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchAction {
    /// App started: show the splash, then decide.
    Start,

    /// Splash delay elapsed; read storage.
    SplashElapsed {
        /// Run the delay belongs to.
        run: u64,
    },

    /// Storage was read.
    Decided {
        /// Run the decision belongs to.
        run: u64,
        /// Value of the launch flag, or `None` if storage failed.
        outcome: Option<LaunchOutcome>,
    },
}

/// What storage said about this install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Launch flag was present.
    pub has_launched: bool,
    /// Session token was present.
    pub has_session: bool,
}

/// Onboarding carousel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingAction {
    /// "Next" (or "Get started" on the last slide).
    Next,

    /// Swipe settled on slide `index`.
    PageSettled(usize),

    /// Exit delay elapsed.
    ExitElapsed,
}

/// Landing screen action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingAction {
    /// "Get started".
    GetStarted,

    /// "Log in".
    Login,
}
