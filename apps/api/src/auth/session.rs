use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use dressrosa_application::Credential;
use dressrosa_core::AppError;
use dressrosa_domain::{RequiredRoles, UserId};
use tower_sessions::Session;

use crate::dto::{LoginRequest, MeResponse};
use crate::error::ApiResult;
use crate::middleware::bearer_token;
use crate::state::AppState;

use super::SESSION_USER_KEY;

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<MeResponse>> {
    let user = state
        .user_service
        .verify_credentials(payload.username.as_str(), payload.password.as_str())
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;
    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;

    let roles = state.role_service.list_user_roles(user.id).await?;
    tracing::info!(username = %user.username, "signed in");

    Ok(Json(MeResponse::new(user, &roles.direct, &roles.effective)))
}

/// Revokes a presented bearer token and ends the session, whichever exist.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> ApiResult<StatusCode> {
    if let Ok(Some(token)) = bearer_token(&headers) {
        state.user_service.logout(token.as_str()).await?;
    }

    let signed_in = session
        .get::<UserId>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session: {error}")))?;
    if signed_in.is_some() {
        session
            .delete()
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
) -> ApiResult<Json<MeResponse>> {
    let authorized = state
        .authorization_service
        .require(&credential, &RequiredRoles::authenticated())
        .await?;
    let user_id = UserId::parse(authorized.identity.subject())?;

    let user = state.user_service.get_user(user_id).await?;
    let roles = state.role_service.list_user_roles(user_id).await?;

    Ok(Json(MeResponse::new(user, &roles.direct, &roles.effective)))
}
