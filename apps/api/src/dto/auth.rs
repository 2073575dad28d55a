use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dressrosa_application::{IssuedAccessToken, UserRecord};
use dressrosa_domain::{RoleName, UserId};
use serde::{Deserialize, Serialize};

use super::role_names;

/// Form payload of the password grant at `/auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn from_issued(issued: IssuedAccessToken, now: DateTime<Utc>) -> Self {
        Self {
            access_token: issued.access_token,
            token_type: "bearer",
            expires_in: (issued.expires_at - now).num_seconds().max(0),
            expires_at: issued.expires_at,
        }
    }
}

/// JSON payload for session sign-in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The caller's account with direct and effective roles.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub effective_roles: Vec<String>,
}

impl MeResponse {
    pub fn new(
        user: UserRecord,
        direct: &BTreeSet<RoleName>,
        effective: &BTreeSet<RoleName>,
    ) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            is_active: user.is_active,
            roles: role_names(direct),
            effective_roles: role_names(effective),
        }
    }
}
