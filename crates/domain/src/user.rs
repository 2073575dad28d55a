//! User account value types and validation rules.

use dressrosa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Minimum accepted username length.
pub const USERNAME_MIN_CHARS: usize = 3;

/// Maximum accepted username length.
pub const USERNAME_MAX_CHARS: usize = 50;

/// Minimum accepted full name length.
pub const FULL_NAME_MIN_CHARS: usize = 2;

/// Maximum accepted full name length.
pub const FULL_NAME_MAX_CHARS: usize = 120;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum accepted password length (bounds Argon2id work per request).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validated login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username. Surrounding whitespace is trimmed, case is kept.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = value.as_ref().trim();
        let length = trimmed.chars().count();

        if length < USERNAME_MIN_CHARS || length > USERNAME_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
            )));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(
                "username must not contain whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let normalized = value.as_ref().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if normalized.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Trims a full name and checks its length.
pub fn normalize_full_name(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if !(FULL_NAME_MIN_CHARS..=FULL_NAME_MAX_CHARS).contains(&length) {
        return Err(AppError::Validation(format!(
            "full name must be between {FULL_NAME_MIN_CHARS} and {FULL_NAME_MAX_CHARS} characters"
        )));
    }

    Ok(trimmed.to_owned())
}

/// Validates a plaintext password length.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}
