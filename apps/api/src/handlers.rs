pub mod access;
pub mod health;
pub mod profile;
pub mod roles;
pub mod taxonomy;
pub mod users;

use dressrosa_application::{AuthorizationService, AuthorizedIdentity, Credential};
use dressrosa_core::AppResult;
use dressrosa_domain::RequiredRoles;

/// Guard used by the administrative endpoints.
async fn require_hr_or_admin(
    authorization_service: &AuthorizationService,
    credential: &Credential,
) -> AppResult<AuthorizedIdentity> {
    authorization_service
        .require(credential, &RequiredRoles::hr_or_admin())
        .await
}
