use axum::extract::Request;
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use dressrosa_application::Credential;
use dressrosa_core::AppError;
use dressrosa_domain::UserId;
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;

/// Resolves the caller's credential and stores it as a request extension.
///
/// A bearer `Authorization` header wins over the session cookie.
pub async fn require_credential(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let credential = match bearer_token(request.headers())? {
        Some(token) => Credential::BearerToken(token),
        None => session
            .get::<UserId>(SESSION_USER_KEY)
            .await
            .map_err(|error| AppError::Internal(format!("failed to read session: {error}")))?
            .map(Credential::Session)
            .ok_or_else(|| AppError::Unauthenticated("authentication required".to_owned()))?,
    };

    request.extensions_mut().insert(credential);
    Ok(next.run(request).await)
}

/// Extracts a bearer token. A present but malformed header is rejected.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthenticated("malformed authorization header".to_owned()))?;

    match value.trim().split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(Some(token.trim().to_owned()))
        }
        _ => Err(AppError::Unauthenticated(
            "authorization header must use the Bearer scheme".to_owned(),
        )),
    }
}
