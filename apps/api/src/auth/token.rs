use axum::extract::State;
use axum::{Form, Json};
use chrono::Utc;

use crate::dto::{TokenRequest, TokenResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Password grant: exchanges credentials for an opaque bearer token.
pub async fn token_handler(
    State(state): State<AppState>,
    Form(payload): Form<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let issued = state
        .user_service
        .login(payload.username.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(TokenResponse::from_issued(issued, Utc::now())))
}
