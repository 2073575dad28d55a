use serde::Serialize;

mod auth;
mod taxonomy;
mod users;

pub use auth::{LoginRequest, MeResponse, TokenRequest, TokenResponse};
pub use taxonomy::{
    LeavePolicyListQuery, LeavePolicyRequest, LeavePolicyResponse, LeaveSubtypeListQuery,
    LeaveSubtypeRequest, LeaveSubtypeResponse, LeaveTypeRequest, LeaveTypeResponse,
};
pub use users::{
    AccessResponse, AccountStatusRequest, AccountStatusResponse, AssignManagerRequest,
    CreateRoleRequest, CreateUserRequest, ProfileResponse, RoleAssignmentRequest, RoleResponse,
    UpdateUserRequest, UserResponse, UserRolesResponse,
};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub postgres: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn default_active() -> bool {
    true
}

fn role_names<'a>(roles: impl IntoIterator<Item = &'a dressrosa_domain::RoleName>) -> Vec<String> {
    roles
        .into_iter()
        .map(|role| role.as_str().to_owned())
        .collect()
}
