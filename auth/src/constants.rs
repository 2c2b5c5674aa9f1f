//! Flow constants.
//!
//! Storage keys, user-facing messages and effect ids shared by the flows.

use octomarket_core::effect::EffectId;

/// Keys in the persisted key-value store.
pub mod storage_keys {
    /// Launch flag. Present (as `"true"`) once the app has been opened.
    pub const HAS_LAUNCHED: &str = "hasLaunched";

    /// Session token. Its presence means the user is logged in.
    pub const USER_TOKEN: &str = "userToken";

    /// Value written to [`HAS_LAUNCHED`] on first launch.
    pub const LAUNCHED_VALUE: &str = "true";
}

/// Messages shown to the user after a submission resolves.
pub mod messages {
    /// Login always fails with this in the simulated backend.
    pub const ACCOUNT_NOT_FOUND: &str =
        "Email/password combo is not associated with an account.";

    /// Signup succeeded.
    pub const SIGNUP_SUCCESS: &str = "Sign up successful! Please verify your email.";

    /// Reset link requested.
    pub const RESET_LINK_SENT: &str = "Reset link sent successfully!";

    /// New password accepted.
    pub const PASSWORD_RESET: &str = "Password reset successful!";

    /// Entered code does not match.
    pub const INVALID_CODE: &str = "Invalid code.";

    /// Email confirmation code accepted.
    pub const EMAIL_VERIFIED: &str = "Email verified!";

    /// Password reset code accepted.
    pub const RESET_CODE_VERIFIED: &str = "Code verified! Set your new password.";

    /// Resend requested.
    pub const CODE_RESENT: &str = "Verification code resent.";
}

/// Cancellation ids for the timers each screen owns.
pub mod effect_ids {
    use super::EffectId;

    /// Auto-dismiss timer of the transient notice.
    pub const NOTICE_DISMISS: EffectId = EffectId::new("notice.dismiss");

    /// Simulated backend delay of a form submission.
    pub const FORM_SUBMIT: EffectId = EffectId::new("form.submit");

    /// Auto-clear of a form error once the form is valid again.
    pub const FORM_ERROR_CLEAR: EffectId = EffectId::new("form.error_clear");

    /// Simulated backend delay of a code verification.
    pub const VERIFY_SUBMIT: EffectId = EffectId::new("verify.submit");

    /// Once-per-second resend cooldown tick.
    pub const VERIFY_RESEND: EffectId = EffectId::new("verify.resend");

    /// Splash delay before the launch decision.
    pub const LAUNCH_SPLASH: EffectId = EffectId::new("launch.splash");

    /// Delay between the last onboarding slide and the landing route.
    pub const ONBOARDING_EXIT: EffectId = EffectId::new("onboarding.exit");
}

/// Number of boxes in the verification code entry.
pub const CODE_LENGTH: usize = 4;

/// Number of onboarding slides.
pub const ONBOARDING_SLIDES: usize = 3;
