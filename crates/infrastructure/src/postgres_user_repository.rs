//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dressrosa_application::{UserRecord, UserRepository};
use dressrosa_core::AppResult;
use dressrosa_domain::UserId;

use crate::postgres_errors::{read_error, write_error};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    username: String,
    email: String,
    full_name: String,
    password_hash: String,
    is_active: bool,
    manager_id: Option<uuid::Uuid>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            full_name: row.full_name,
            password_hash: row.password_hash,
            is_active: row.is_active,
            manager_id: row.manager_id.map(UserId::from_uuid),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, full_name, password_hash, is_active, manager_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| read_error(error, "find user by id"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, full_name, password_hash, is_active, manager_id, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| read_error(error, "find user by username"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, full_name, password_hash, is_active, manager_id, created_at
            FROM users
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| read_error(error, "find user by email"))?;

        Ok(row.map(UserRecord::from))
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, full_name, password_hash, is_active, manager_id, created_at
            FROM users
            ORDER BY created_at DESC, username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| read_error(error, "list users"))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn create_user(&self, user: UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, full_name, password_hash, is_active, manager_id, created_at
            )
            VALUES ($1, $2, LOWER($3), $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.full_name.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.is_active)
        .bind(user.manager_id.map(|id| id.as_uuid()))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, "create user"))?;

        Ok(())
    }

    async fn update_user(&self, user: UserRecord) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2,
                email = LOWER($3),
                full_name = $4,
                password_hash = $5,
                is_active = $6,
                manager_id = $7,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.full_name.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.is_active)
        .bind(user.manager_id.map(|id| id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, "update user"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        // Role assignments and tokens cascade; reports lose their manager.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| write_error(error, "delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}
