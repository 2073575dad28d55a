use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dressrosa_core::AppError;
use serde::Serialize;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::ParentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::SubtypeMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self.0 {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::WWW_AUTHENTICATE;
    use axum::response::IntoResponse;
    use dressrosa_core::AppError;

    use super::ApiError;

    fn status_of(error: AppError) -> StatusCode {
        ApiError::from(error).into_response().status()
    }

    #[test]
    fn application_errors_map_to_http_statuses() {
        let cases = [
            (AppError::Validation("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::Unauthenticated("x".to_owned()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".to_owned()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (AppError::ParentNotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (AppError::AlreadyExists("x".to_owned()), StatusCode::CONFLICT),
            (
                AppError::SubtypeMismatch("x".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Internal("x".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(status_of(error), expected);
        }
    }

    #[test]
    fn unauthenticated_responses_advertise_bearer_scheme() {
        let response =
            ApiError::from(AppError::Unauthenticated("missing".to_owned())).into_response();
        assert_eq!(
            response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok()),
            Some("Bearer")
        );

        let forbidden = ApiError::from(AppError::Forbidden("no".to_owned())).into_response();
        assert!(forbidden.headers().get(WWW_AUTHENTICATE).is_none());
    }
}
