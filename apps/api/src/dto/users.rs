use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dressrosa_application::{CreateUserInput, RoleRecord, UpdateUserInput, UserRecord, UserRoles};
use dressrosa_domain::{RoleId, RoleName, UserId};
use serde::{Deserialize, Serialize};

use super::{default_active, role_names};

/// API representation of a user account.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub manager_id: Option<UserId>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(user: UserRecord, roles: &BTreeSet<RoleName>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            manager_id: user.manager_id,
            roles: role_names(roles),
            created_at: user.created_at,
        }
    }
}

/// Incoming payload for user creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            full_name: value.full_name,
            password: value.password,
            is_active: value.is_active,
        }
    }
}

/// Incoming payload for user replacement. Omit `password` to keep the current one.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub password: Option<String>,
    pub is_active: bool,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            full_name: value.full_name,
            password: value.password,
            is_active: value.is_active,
        }
    }
}

/// Incoming payload for manager mapping; `null` clears it.
#[derive(Debug, Deserialize)]
pub struct AssignManagerRequest {
    pub manager_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct AccountStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct AccountStatusResponse {
    pub user_id: UserId,
    pub username: String,
    pub is_active: bool,
    pub account_status: &'static str,
}

impl From<UserRecord> for AccountStatusResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            user_id: value.id,
            username: value.username,
            is_active: value.is_active,
            account_status: account_status(value.is_active),
        }
    }
}

/// The caller's profile, including the resolved manager name.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub account_status: &'static str,
    pub manager_id: Option<UserId>,
    pub manager_name: Option<String>,
    pub roles: Vec<String>,
}

impl ProfileResponse {
    pub fn new(user: UserRecord, manager: Option<UserRecord>, roles: &BTreeSet<RoleName>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            account_status: account_status(user.is_active),
            manager_id: user.manager_id,
            manager_name: manager.map(|manager| manager.full_name),
            roles: role_names(roles),
        }
    }
}

/// API representation of a role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
}

impl From<RoleRecord> for RoleResponse {
    fn from(value: RoleRecord) -> Self {
        Self {
            id: value.id,
            name: value.name.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleAssignmentRequest {
    pub role_name: String,
}

#[derive(Debug, Serialize)]
pub struct UserRolesResponse {
    pub user_id: UserId,
    pub direct: Vec<String>,
    pub effective: Vec<String>,
}

impl From<UserRoles> for UserRolesResponse {
    fn from(value: UserRoles) -> Self {
        Self {
            user_id: value.user_id,
            direct: role_names(&value.direct),
            effective: role_names(&value.effective),
        }
    }
}

/// Result of a role-gated access probe.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub message: String,
}

fn account_status(is_active: bool) -> &'static str {
    if is_active { "active" } else { "inactive" }
}
