//! Field validators for the account and note forms.
//!
//! Each validator looks at one raw string and either accepts it or returns the
//! first rule it breaks. Rules are checked in a fixed order and short-circuit,
//! so a value never carries more than one reason at a time:
//!
//! - Username (trimmed): at least 3 chars, at most 32, only `[A-Za-z0-9_]`
//! - Email (trimmed): `local@domain.tld` shape, no whitespace, a single `@`
//! - Password strength: length >= 8, then lowercase, uppercase, digit, and
//!   (under [`PasswordPolicy::Strict`]) a non-alphanumeric character
//! - Login password: present
//! - Confirmation: equal to the password field
//!
//! Validators are pure: no I/O, no allocation beyond the returned error.
//!
//! # Examples
//! ```
//! use briefly::validate::{validate_password, validate_username, FieldError, PasswordPolicy};
//!
//! assert!(validate_username("reader_42").is_ok());
//! assert_eq!(validate_username("ab"), Err(FieldError::UsernameTooShort));
//! assert_eq!(
//!     validate_password("Valid1Aa", PasswordPolicy::Strict),
//!     Err(FieldError::PasswordMissingSpecial)
//! );
//! assert!(validate_password("Valid1Aa!", PasswordPolicy::Strict).is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Which password-strength rule set applies to new passwords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordPolicy {
    /// Length, lowercase, uppercase and digit.
    Standard,
    /// Everything in `Standard` plus a special character.
    #[default]
    Strict,
}

impl FromStr for PasswordPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(PasswordPolicy::Standard),
            "strict" => Ok(PasswordPolicy::Strict),
            other => Err(format!(
                "unknown password policy '{}' (expected 'standard' or 'strict')",
                other
            )),
        }
    }
}

impl fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordPolicy::Standard => write!(f, "standard"),
            PasswordPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Reason a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    UsernameTooShort,
    UsernameTooLong,
    UsernameInvalidCharacters,
    EmailInvalid,
    PasswordTooShort,
    PasswordMissingLowercase,
    PasswordMissingUppercase,
    PasswordMissingDigit,
    PasswordMissingSpecial,
    Required,
    PasswordMismatch,
    EmptyNote,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FieldError::UsernameTooShort => "Username must be at least 3 characters",
            FieldError::UsernameTooLong => "Username must be at most 32 characters",
            FieldError::UsernameInvalidCharacters => "Only letters, numbers and underscores",
            FieldError::EmailInvalid => "Enter a valid email",
            FieldError::PasswordTooShort => "Password must be at least 8 characters",
            FieldError::PasswordMissingLowercase => "Add a lowercase letter",
            FieldError::PasswordMissingUppercase => "Add an uppercase letter",
            FieldError::PasswordMissingDigit => "Add a number",
            FieldError::PasswordMissingSpecial => "Add a special character",
            FieldError::Required => "Please fill out this field",
            FieldError::PasswordMismatch => "Passwords do not match",
            FieldError::EmptyNote => "Note cannot be empty",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for FieldError {}

pub type FieldResult = Result<(), FieldError>;

pub fn validate_username(value: &str) -> FieldResult {
    let value = value.trim();
    let len = value.chars().count();

    if len < USERNAME_MIN_LEN {
        return Err(FieldError::UsernameTooShort);
    }
    if len > USERNAME_MAX_LEN {
        return Err(FieldError::UsernameTooLong);
    }
    if !value.chars().all(is_username_char) {
        return Err(FieldError::UsernameInvalidCharacters);
    }
    Ok(())
}

fn is_username_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

pub fn validate_email(value: &str) -> FieldResult {
    if is_email_shaped(value.trim()) {
        Ok(())
    } else {
        Err(FieldError::EmailInvalid)
    }
}

/// `local@domain.tld`: no whitespace anywhere, exactly one `@` with a non-empty
/// local part, and a domain holding a `.` with text on both sides.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, ch)| ch == '.' && i > 0 && i + 1 < domain.len())
}

/// Strength check for new passwords. The value is not trimmed.
pub fn validate_password(value: &str, policy: PasswordPolicy) -> FieldResult {
    if value.chars().count() < PASSWORD_MIN_LEN {
        return Err(FieldError::PasswordTooShort);
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(FieldError::PasswordMissingLowercase);
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(FieldError::PasswordMissingUppercase);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(FieldError::PasswordMissingDigit);
    }
    if policy == PasswordPolicy::Strict && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FieldError::PasswordMissingSpecial);
    }
    Ok(())
}

/// Login only checks that something was typed.
pub fn validate_login_password(value: &str) -> FieldResult {
    if value.is_empty() {
        Err(FieldError::Required)
    } else {
        Ok(())
    }
}

pub fn validate_confirmation(password: &str, confirm: &str) -> FieldResult {
    if password == confirm {
        Ok(())
    } else {
        Err(FieldError::PasswordMismatch)
    }
}

pub fn validate_note(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        Err(FieldError::EmptyNote)
    } else {
        Ok(())
    }
}
