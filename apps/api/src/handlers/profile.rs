use axum::Json;
use axum::extract::{Extension, Path, State};
use dressrosa_application::Credential;
use dressrosa_core::AppError;
use dressrosa_domain::{RequiredRoles, UserId};

use crate::dto::{AccountStatusRequest, AccountStatusResponse, ProfileResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::require_hr_or_admin;

pub async fn my_profile_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
) -> ApiResult<Json<ProfileResponse>> {
    let authorized = state
        .authorization_service
        .require(&credential, &RequiredRoles::authenticated())
        .await?;
    let user = state
        .user_service
        .get_user(UserId::parse(authorized.identity.subject())?)
        .await?;

    // A manager deleted between reads leaves the name empty.
    let manager = match user.manager_id {
        Some(manager_id) => match state.user_service.get_user(manager_id).await {
            Ok(manager) => Some(manager),
            Err(AppError::NotFound(_)) => None,
            Err(error) => return Err(error.into()),
        },
        None => None,
    };
    let roles = state.role_service.list_user_roles(user.id).await?;

    Ok(Json(ProfileResponse::new(user, manager, &roles.direct)))
}

pub async fn account_status_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<AccountStatusResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user = state.user_service.get_user(UserId::parse(&user_id)?).await?;
    Ok(Json(AccountStatusResponse::from(user)))
}

pub async fn update_account_status_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(user_id): Path<String>,
    Json(payload): Json<AccountStatusRequest>,
) -> ApiResult<Json<AccountStatusResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let user = state
        .user_service
        .set_user_active(UserId::parse(&user_id)?, payload.is_active)
        .await?;
    Ok(Json(AccountStatusResponse::from(user)))
}
