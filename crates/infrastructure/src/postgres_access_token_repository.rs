//! PostgreSQL-backed access token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dressrosa_application::AccessTokenRepository;
use dressrosa_core::AppResult;
use dressrosa_domain::UserId;

use crate::postgres_errors::{read_error, write_error};

/// PostgreSQL implementation of the access token port.
///
/// Only SHA-256 hashes of tokens are stored.
#[derive(Clone)]
pub struct PostgresAccessTokenRepository {
    pool: PgPool,
}

impl PostgresAccessTokenRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessTokenRepository for PostgresAccessTokenRepository {
    async fn store_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let purged = sqlx::query(
            "DELETE FROM access_tokens WHERE user_id = $1 AND (expires_at <= now() OR revoked_at IS NOT NULL)",
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, "purge stale access tokens"))?
        .rows_affected();

        if purged > 0 {
            tracing::debug!(user_id = %user_id, purged, "purged stale access tokens");
        }

        sqlx::query(
            r#"
            INSERT INTO access_tokens (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token_hash)
        .bind(user_id.as_uuid())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, "store access token"))?;

        Ok(())
    }

    async fn find_token_owner(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>> {
        let owner = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT user_id
            FROM access_tokens
            WHERE token_hash = $1
              AND revoked_at IS NULL
              AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| read_error(error, "resolve access token"))?;

        Ok(owner.map(UserId::from_uuid))
    }

    async fn revoke_token(&self, token_hash: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE access_tokens
            SET revoked_at = now()
            WHERE token_hash = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, "revoke access token"))?;

        Ok(result.rows_affected() > 0)
    }
}
