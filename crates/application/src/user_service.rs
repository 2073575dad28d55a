//! User administration and credential login.
//!
//! Login failures share one generic message so callers cannot tell unknown
//! usernames, wrong passwords and inactive accounts apart.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{
    EmailAddress, UserId, Username, normalize_full_name, validate_password,
};

use crate::token_crypto::{generate_token, hash_token};
use crate::{AccessTokenRepository, PasswordHasher, UserRecord, UserRepository};

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Plaintext password.
    pub password: String,
    /// Whether the account may sign in.
    pub is_active: bool,
}

/// Input for replacing a user's profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// New plaintext password; `None` keeps the current one.
    pub password: Option<String>,
    /// Whether the account may sign in.
    pub is_active: bool,
}

/// Bearer token handed out by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAccessToken {
    /// Raw token; only its hash is stored.
    pub access_token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Authenticated user.
    pub user: UserRecord,
}

/// Application service for user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    access_token_repository: Arc<dyn AccessTokenRepository>,
    access_token_ttl: Duration,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        access_token_repository: Arc<dyn AccessTokenRepository>,
        access_token_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            access_token_repository,
            access_token_ttl,
        }
    }
}

mod accounts;
mod login;
