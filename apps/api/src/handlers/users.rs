use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use dressrosa_application::{Credential, UserRecord};
use dressrosa_domain::UserId;

use crate::dto::{
    AssignManagerRequest, CreateUserRequest, RoleAssignmentRequest, UpdateUserRequest,
    UserResponse, UserRolesResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::require_hr_or_admin;

async fn user_response(state: &AppState, user: UserRecord) -> ApiResult<UserResponse> {
    let roles = state.role_service.list_user_roles(user.id).await?;
    Ok(UserResponse::new(user, &roles.direct))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let users = state.user_service.list_users().await?;
    let mut responses = Vec::with_capacity(users.len());
    for user in users {
        responses.push(user_response(&state, user).await?);
    }

    Ok(Json(responses))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user = state.user_service.get_user(UserId::parse(&user_id)?).await?;
    Ok(Json(user_response(&state, user).await?))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user = state.user_service.create_user(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user_response(&state, user).await?)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user = state
        .user_service
        .update_user(UserId::parse(&user_id)?, payload.into())
        .await?;
    Ok(Json(user_response(&state, user).await?))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    state
        .user_service
        .delete_user(UserId::parse(&user_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_manager_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignManagerRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user = state
        .user_service
        .assign_manager(UserId::parse(&user_id)?, payload.manager_id)
        .await?;
    Ok(Json(user_response(&state, user).await?))
}

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserRolesResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user_id = UserId::parse(&user_id)?;
    state.user_service.get_user(user_id).await?;
    let roles = state.role_service.list_user_roles(user_id).await?;

    Ok(Json(UserRolesResponse::from(roles)))
}

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
    Json(payload): Json<RoleAssignmentRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user_id = UserId::parse(&user_id)?;
    state
        .role_service
        .assign_role(user_id, payload.role_name.as_str())
        .await?;

    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(user_response(&state, user).await?))
}

pub async fn unassign_user_role_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path((user_id, role_name)): Path<(String, String)>,
) -> ApiResult<Json<UserResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user_id = UserId::parse(&user_id)?;
    state
        .role_service
        .unassign_role(user_id, role_name.as_str())
        .await?;

    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(user_response(&state, user).await?))
}
