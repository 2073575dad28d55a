use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Liveness plus a round trip to Postgres.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let check = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.postgres_pool)
        .await;

    match check {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                postgres: "ok",
                detail: None,
            }),
        ),
        Err(error) => {
            tracing::warn!(error = %error, "postgres health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    postgres: "error",
                    detail: Some(format!("postgres check failed: {error}")),
                }),
            )
        }
    }
}
