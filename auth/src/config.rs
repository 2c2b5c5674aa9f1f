//! Flow configuration.
//!
//! Timings and policy knobs for every flow. Values default to what the app
//! ships with and can be overridden from the environment for demos and tests.

use crate::error::ConfigError;
use std::time::Duration;

/// Smallest password minimum `validate` accepts.
pub const MIN_PASSWORD_LENGTH_FLOOR: usize = 6;

/// Configuration shared by all flow reducers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Minimum password length in characters.
    ///
    /// Default: 8
    pub password_min_length: usize,

    /// How long a transient notice stays visible.
    ///
    /// Default: 1800 ms
    pub notice_duration: Duration,

    /// Simulated backend delay of the login form.
    ///
    /// Default: 2000 ms
    pub login_delay: Duration,

    /// How long a form error lingers once every rule passes again.
    ///
    /// Default: 2000 ms
    pub error_clear_delay: Duration,

    /// Simulated backend delay of signup, reset and new-password forms.
    ///
    /// Default: 1200 ms
    pub submit_delay: Duration,

    /// Simulated backend delay of a code verification.
    ///
    /// Default: 1200 ms
    pub verify_delay: Duration,

    /// Resend cooldown in whole seconds.
    ///
    /// Default: 30
    pub resend_cooldown_secs: u32,

    /// Splash delay before the launch decision.
    ///
    /// Default: 1000 ms
    pub splash_delay: Duration,

    /// Delay between finishing onboarding and leaving for the landing route.
    ///
    /// Default: 50 ms
    pub onboarding_exit_delay: Duration,

    /// Code accepted by the simulated verification backend.
    ///
    /// Default: `"1234"`
    pub expected_code: String,
}

impl FlowConfig {
    /// Set the minimum password length.
    #[must_use]
    pub const fn with_password_min_length(mut self, length: usize) -> Self {
        self.password_min_length = length;
        self
    }

    /// Set the notice display duration.
    #[must_use]
    pub const fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = duration;
        self
    }

    /// Set the login delay.
    #[must_use]
    pub const fn with_login_delay(mut self, duration: Duration) -> Self {
        self.login_delay = duration;
        self
    }

    /// Set how long a form error lingers once the form is valid.
    #[must_use]
    pub const fn with_error_clear_delay(mut self, duration: Duration) -> Self {
        self.error_clear_delay = duration;
        self
    }

    /// Set the delay of the other forms.
    #[must_use]
    pub const fn with_submit_delay(mut self, duration: Duration) -> Self {
        self.submit_delay = duration;
        self
    }

    /// Set the verification delay.
    #[must_use]
    pub const fn with_verify_delay(mut self, duration: Duration) -> Self {
        self.verify_delay = duration;
        self
    }

    /// Set the resend cooldown.
    #[must_use]
    pub const fn with_resend_cooldown_secs(mut self, seconds: u32) -> Self {
        self.resend_cooldown_secs = seconds;
        self
    }

    /// Set the splash delay.
    #[must_use]
    pub const fn with_splash_delay(mut self, duration: Duration) -> Self {
        self.splash_delay = duration;
        self
    }

    /// Set the onboarding exit delay.
    #[must_use]
    pub const fn with_onboarding_exit_delay(mut self, duration: Duration) -> Self {
        self.onboarding_exit_delay = duration;
        self
    }

    /// Set the code the simulated backend accepts.
    #[must_use]
    pub fn with_expected_code(mut self, code: impl Into<String>) -> Self {
        self.expected_code = code.into();
        self
    }

    /// Load configuration from `OCTOMARKET_*` environment variables.
    ///
    /// Unset variables keep their defaults. Reads
    /// `OCTOMARKET_PASSWORD_MIN_LENGTH`, `OCTOMARKET_NOTICE_MS`,
    /// `OCTOMARKET_SUBMIT_DELAY_MS`, `OCTOMARKET_LOGIN_DELAY_MS` and
    /// `OCTOMARKET_RESEND_COOLDOWN_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is not a number and
    /// [`ConfigError::ValidationError`] if the result fails [`Self::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(length) = parse_var(&lookup, "OCTOMARKET_PASSWORD_MIN_LENGTH")? {
            config.password_min_length = usize::try_from(length).map_err(|_| {
                ConfigError::InvalidValue {
                    var: "OCTOMARKET_PASSWORD_MIN_LENGTH",
                    value: length.to_string(),
                }
            })?;
        }
        if let Some(ms) = parse_var(&lookup, "OCTOMARKET_NOTICE_MS")? {
            config.notice_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "OCTOMARKET_SUBMIT_DELAY_MS")? {
            config.submit_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "OCTOMARKET_LOGIN_DELAY_MS")? {
            config.login_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var(&lookup, "OCTOMARKET_RESEND_COOLDOWN_SECS")? {
            config.resend_cooldown_secs =
                u32::try_from(secs).map_err(|_| ConfigError::InvalidValue {
                    var: "OCTOMARKET_RESEND_COOLDOWN_SECS",
                    value: secs.to_string(),
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns error if any duration is zero, the cooldown is zero, the
    /// password minimum is below [`MIN_PASSWORD_LENGTH_FLOOR`] or the expected
    /// code is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password_min_length < MIN_PASSWORD_LENGTH_FLOOR {
            return Err(ConfigError::ValidationError(format!(
                "password_min_length must be >= {MIN_PASSWORD_LENGTH_FLOOR}"
            )));
        }

        let durations = [
            ("notice_duration", self.notice_duration),
            ("login_delay", self.login_delay),
            ("error_clear_delay", self.error_clear_delay),
            ("submit_delay", self.submit_delay),
            ("verify_delay", self.verify_delay),
            ("splash_delay", self.splash_delay),
            ("onboarding_exit_delay", self.onboarding_exit_delay),
        ];
        for (name, duration) in durations {
            if duration.is_zero() {
                return Err(ConfigError::ValidationError(format!("{name} must be > 0")));
            }
        }

        if self.resend_cooldown_secs == 0 {
            return Err(ConfigError::ValidationError(
                "resend_cooldown_secs must be > 0".to_string(),
            ));
        }
        if self.expected_code.is_empty() {
            return Err(ConfigError::ValidationError(
                "expected_code cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            notice_duration: Duration::from_millis(1800),
            login_delay: Duration::from_millis(2000),
            error_clear_delay: Duration::from_millis(2000),
            submit_delay: Duration::from_millis(1200),
            verify_delay: Duration::from_millis(1200),
            resend_cooldown_secs: 30,
            splash_delay: Duration::from_millis(1000),
            onboarding_exit_delay: Duration::from_millis(50),
            expected_code: "1234".to_string(),
        }
    }
}

fn parse_var<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue { var, value })
        })
        .transpose()
}
