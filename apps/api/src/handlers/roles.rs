use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use dressrosa_application::Credential;

use crate::dto::{CreateRoleRequest, RoleResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::require_hr_or_admin;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let roles = state
        .role_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let role = state.role_service.create_role(payload.name.as_str()).await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(role_name): Path<String>,
) -> ApiResult<StatusCode> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    state.role_service.delete_role(role_name.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}
