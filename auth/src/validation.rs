//! Field validators.
//!
//! Pure, total functions over strings. Form rule chains live here too so the
//! reducers only decide *when* to validate, not *how*.

use crate::error::ValidationError;
use crate::state::{Field, FormKind, FormValues};
use regex::Regex;
use std::sync::LazyLock;

/// Loose `something@something.something` check. Not RFC 5322 and not meant to be.
static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+"));

/// Empty or exactly one ASCII digit.
static CODE_DIGIT_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[0-9]?$"));

/// Returns `true` if `email` contains non-whitespace, `@`, non-whitespace, `.`, non-whitespace.
///
/// # Examples
///
/// ```
/// use octomarket_auth::validation::is_valid_email;
///
/// assert!(is_valid_email("a@b.c"));
/// assert!(!is_valid_email("a@b"));
/// assert!(!is_valid_email("ab.c"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_ok_and(|re| re.is_match(email))
}

/// Returns `true` if `password` has at least `min_length` characters, an ASCII
/// letter and an ASCII digit.
#[must_use]
pub fn is_valid_password(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length && has_letter_and_digit(password)
}

/// Returns `true` if `value` is acceptable in one code entry box.
#[must_use]
pub fn is_code_digit(value: &str) -> bool {
    CODE_DIGIT_PATTERN
        .as_ref()
        .is_ok_and(|re| re.is_match(value))
}

fn has_letter_and_digit(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_alphabetic()) && password.chars().any(|c| c.is_ascii_digit())
}

/// Password policy shared by every form that takes a new or existing password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub min_length: usize,
}

impl PasswordPolicy {
    /// Create a policy with the given minimum length.
    #[must_use]
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Check `password`, reporting the first failing rule.
    ///
    /// Order: required, length, letter and digit.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] the password trips.
    pub fn check(&self, password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        if password.chars().count() < self.min_length {
            return Err(ValidationError::PasswordTooShort {
                min_length: self.min_length,
            });
        }
        if !has_letter_and_digit(password) {
            return Err(ValidationError::PasswordComposition);
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(8)
    }
}

fn require(values: &FormValues, field: Field, error: ValidationError) -> Result<(), ValidationError> {
    if values.get(field).is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}

fn check_email(values: &FormValues) -> Result<(), ValidationError> {
    require(values, Field::Email, ValidationError::EmailRequired)?;
    if is_valid_email(values.get(Field::Email).trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

fn check_confirmation(values: &FormValues) -> Result<(), ValidationError> {
    require(
        values,
        Field::ConfirmPassword,
        ValidationError::ConfirmPasswordRequired,
    )?;
    if values.get(Field::ConfirmPassword) == values.get(Field::Password) {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// Run the rule chain of `kind` over `values`.
///
/// Rules run in a fixed order and the first failure is returned; later rules
/// are not evaluated.
///
/// # Errors
///
/// Returns the first failing rule.
pub fn validate_form(
    kind: FormKind,
    values: &FormValues,
    policy: PasswordPolicy,
) -> Result<(), ValidationError> {
    match kind {
        FormKind::Login => {
            check_email(values)?;
            policy.check(values.get(Field::Password))
        },
        FormKind::Signup => {
            require(values, Field::FirstName, ValidationError::FirstNameRequired)?;
            require(values, Field::LastName, ValidationError::LastNameRequired)?;
            check_email(values)?;
            policy.check(values.get(Field::Password))?;
            check_confirmation(values)?;
            require(values, Field::Birthday, ValidationError::BirthdayRequired)
        },
        FormKind::ResetPassword => check_email(values),
        FormKind::CreateNewPassword => {
            policy.check(values.get(Field::Password))?;
            check_confirmation(values)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(Field, &str)]) -> FormValues {
        let mut values = FormValues::default();
        for (field, value) in pairs {
            values.set(*field, (*value).to_string());
        }
        values
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("jane.doe@market.example"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane@market"));
        assert!(!is_valid_email("jane market.com"));
    }

    #[test]
    fn test_email_check_is_unanchored() {
        // Loose on purpose: surrounding text still matches
        assert!(is_valid_email("x a@b.c y"));
    }

    #[test]
    fn test_password_rules() {
        assert!(is_valid_password("abcdefg1", 8));
        assert!(!is_valid_password("abcdef1", 8));
        assert!(!is_valid_password("abcdefgh", 8));
        assert!(!is_valid_password("12345678", 8));
        assert!(is_valid_password("abcde1", 6));
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Seven characters, nine bytes
        assert!(!is_valid_password("ééabcd1", 8));
        assert!(is_valid_password("ééabcde1", 8));
    }

    #[test]
    fn test_policy_order() {
        let policy = PasswordPolicy::default();
        assert_eq!(policy.check(""), Err(ValidationError::PasswordRequired));
        assert_eq!(
            policy.check("abc"),
            Err(ValidationError::PasswordTooShort { min_length: 8 })
        );
        assert_eq!(
            policy.check("abcdefgh"),
            Err(ValidationError::PasswordComposition)
        );
        assert_eq!(policy.check("abcdefg1"), Ok(()));
    }

    #[test]
    fn test_code_digit() {
        assert!(is_code_digit(""));
        assert!(is_code_digit("7"));
        assert!(!is_code_digit("12"));
        assert!(!is_code_digit("a"));
        assert!(!is_code_digit("٣"));
    }

    #[test]
    fn test_login_first_failure_wins() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            validate_form(FormKind::Login, &values(&[]), policy),
            Err(ValidationError::EmailRequired)
        );
        assert_eq!(
            validate_form(FormKind::Login, &values(&[(Field::Email, "nope")]), policy),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_form(FormKind::Login, &values(&[(Field::Email, "a@b.c")]), policy),
            Err(ValidationError::PasswordRequired)
        );
        assert_eq!(
            validate_form(
                FormKind::Login,
                &values(&[(Field::Email, "a@b.c"), (Field::Password, "secret12")]),
                policy
            ),
            Ok(())
        );
    }

    #[test]
    fn test_whitespace_counts_as_entered() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            validate_form(FormKind::ResetPassword, &values(&[(Field::Email, "   ")]), policy),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_form(
                FormKind::Signup,
                &values(&[(Field::FirstName, " "), (Field::LastName, " ")]),
                policy
            ),
            Err(ValidationError::EmailRequired)
        );
    }

    #[test]
    fn test_signup_rule_order() {
        let policy = PasswordPolicy::default();
        let mut form = values(&[]);
        assert_eq!(
            validate_form(FormKind::Signup, &form, policy),
            Err(ValidationError::FirstNameRequired)
        );

        form.set(Field::FirstName, "Ada".into());
        assert_eq!(
            validate_form(FormKind::Signup, &form, policy),
            Err(ValidationError::LastNameRequired)
        );

        form.set(Field::LastName, "Lovelace".into());
        form.set(Field::Email, "ada@engine.io".into());
        form.set(Field::Password, "analytic1".into());
        assert_eq!(
            validate_form(FormKind::Signup, &form, policy),
            Err(ValidationError::ConfirmPasswordRequired)
        );

        form.set(Field::ConfirmPassword, "analytic2".into());
        assert_eq!(
            validate_form(FormKind::Signup, &form, policy),
            Err(ValidationError::PasswordMismatch)
        );

        form.set(Field::ConfirmPassword, "analytic1".into());
        assert_eq!(
            validate_form(FormKind::Signup, &form, policy),
            Err(ValidationError::BirthdayRequired)
        );

        // Referral code stays optional
        form.set(Field::Birthday, "1815-12-10".into());
        assert_eq!(validate_form(FormKind::Signup, &form, policy), Ok(()));
    }

    #[test]
    fn test_reset_and_new_password_chains() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            validate_form(FormKind::ResetPassword, &values(&[(Field::Email, "a@b")]), policy),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_form(
                FormKind::CreateNewPassword,
                &values(&[(Field::Password, "abcdefg1"), (Field::ConfirmPassword, "abcdefg2")]),
                policy
            ),
            Err(ValidationError::PasswordMismatch)
        );
    }
}
