use axum::Json;
use axum::extract::{Extension, Path, State};
use dressrosa_application::Credential;
use dressrosa_domain::{RequiredRoles, RoleName};

use crate::dto::AccessResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Succeeds when the caller's effective roles include `role`.
pub async fn role_access_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(role): Path<String>,
) -> ApiResult<Json<AccessResponse>> {
    let role = RoleName::new(role)?;
    let authorized = state
        .authorization_service
        .require(&credential, &RequiredRoles::any_of([role.clone()]))
        .await?;

    Ok(Json(AccessResponse {
        message: format!(
            "{role} access granted to {}",
            authorized.identity.username()
        ),
    }))
}
