use dressrosa_application::{AuthorizationService, RoleService, TaxonomyService, UserService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub user_service: UserService,
    pub role_service: RoleService,
    pub taxonomy_service: TaxonomyService,
    pub postgres_pool: PgPool,
}
