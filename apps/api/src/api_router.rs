use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

/// Builds every route under `api_prefix`. The session layer is added by the caller.
pub fn build_router(app_state: AppState, api_prefix: &str) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/access/{role}",
            get(handlers::access::role_access_handler),
        )
        .route("/profile/me", get(handlers::profile::my_profile_handler))
        .route(
            "/profile/{user_id}/status",
            get(handlers::profile::account_status_handler)
                .put(handlers::profile::update_account_status_handler),
        )
        .route(
            "/leave-types",
            get(handlers::taxonomy::list_leave_types_handler)
                .post(handlers::taxonomy::create_leave_type_handler),
        )
        .route(
            "/leave-types/{leave_type_id}",
            get(handlers::taxonomy::get_leave_type_handler)
                .put(handlers::taxonomy::update_leave_type_handler)
                .delete(handlers::taxonomy::delete_leave_type_handler),
        )
        .route(
            "/leave-subtypes",
            get(handlers::taxonomy::list_leave_subtypes_handler)
                .post(handlers::taxonomy::create_leave_subtype_handler),
        )
        .route(
            "/leave-subtypes/{leave_subtype_id}",
            get(handlers::taxonomy::get_leave_subtype_handler)
                .put(handlers::taxonomy::update_leave_subtype_handler)
                .delete(handlers::taxonomy::delete_leave_subtype_handler),
        )
        .route(
            "/leave-policies",
            get(handlers::taxonomy::list_leave_policies_handler)
                .post(handlers::taxonomy::create_leave_policy_handler),
        )
        .route(
            "/leave-policies/{leave_policy_id}",
            get(handlers::taxonomy::get_leave_policy_handler)
                .put(handlers::taxonomy::update_leave_policy_handler)
                .delete(handlers::taxonomy::delete_leave_policy_handler),
        )
        .route(
            "/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/users/{user_id}",
            get(handlers::users::get_user_handler)
                .put(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        )
        .route(
            "/users/{user_id}/manager",
            put(handlers::users::assign_manager_handler),
        )
        .route(
            "/users/{user_id}/roles",
            get(handlers::users::list_user_roles_handler)
                .post(handlers::users::assign_user_role_handler),
        )
        .route(
            "/users/{user_id}/roles/{role_name}",
            delete(handlers::users::unassign_user_role_handler),
        )
        .route(
            "/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/roles/{role_name}",
            delete(handlers::roles::delete_role_handler),
        )
        .layer(from_fn(middleware::require_credential));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/token", post(auth::token_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    let api_routes = public_routes.merge(protected_routes);
    let router = if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    };

    router
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
