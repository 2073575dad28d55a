use std::sync::Arc;

use dressrosa_application::{
    AuthorizationService, CatalogSeeder, RoleService, TaxonomyService, UserService,
};
use dressrosa_core::AppError;
use dressrosa_domain::RoleHierarchy;
use dressrosa_infrastructure::{
    Argon2PasswordHasher, PostgresAccessTokenRepository, PostgresRoleRepository,
    PostgresTaxonomyRepository, PostgresUserRepository,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub async fn connect_and_migrate(config: &ApiConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

/// Wires the Postgres adapters into the application services.
pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let role_repository = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let access_token_repository = Arc::new(PostgresAccessTokenRepository::new(pool.clone()));
    let taxonomy_repository = Arc::new(PostgresTaxonomyRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let hierarchy = RoleHierarchy::standard();

    AppState {
        authorization_service: AuthorizationService::new(
            user_repository.clone(),
            role_repository.clone(),
            access_token_repository.clone(),
            hierarchy.clone(),
        ),
        user_service: UserService::new(
            user_repository.clone(),
            password_hasher,
            access_token_repository,
            config.access_token_ttl,
        ),
        role_service: RoleService::new(user_repository, role_repository, hierarchy),
        taxonomy_service: TaxonomyService::new(taxonomy_repository),
        postgres_pool: pool,
    }
}

pub fn build_catalog_seeder(pool: PgPool) -> CatalogSeeder {
    CatalogSeeder::new(Arc::new(PostgresTaxonomyRepository::new(pool)))
}

pub async fn build_session_layer(
    pool: PgPool,
    config: &ApiConfig,
) -> Result<SessionManagerLayer<PostgresStore>, AppError> {
    let session_store = PostgresStore::new(pool)
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    Ok(SessionManagerLayer::new(session_store)
        .with_name(config.session_cookie_name.clone())
        .with_secure(config.session_cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            config.access_token_ttl.num_minutes(),
        ))))
}
