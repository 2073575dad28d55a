use dressrosa_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps a failed write to `AlreadyExists`, `ParentNotFound` or `Internal`.
pub(crate) fn write_error(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return AppError::AlreadyExists(format!(
                    "failed to {operation}: {}",
                    database_error.message()
                ));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::ParentNotFound(format!(
                    "failed to {operation}: {}",
                    database_error.message()
                ));
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

/// Maps a failed read to `Internal`.
pub(crate) fn read_error(error: sqlx::Error, operation: &str) -> AppError {
    AppError::Internal(format!("failed to {operation}: {error}"))
}
