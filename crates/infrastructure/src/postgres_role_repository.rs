//! PostgreSQL-backed role repository.

use async_trait::async_trait;
use sqlx::PgPool;

use dressrosa_application::{RoleRecord, RoleRepository};
use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{RoleId, RoleName, UserId};

use crate::postgres_errors::{read_error, write_error};

/// PostgreSQL implementation of the role repository port.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
}

impl TryFrom<RoleRow> for RoleRecord {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let name = RoleName::new(&row.name).map_err(|error| {
            AppError::Internal(format!("stored role '{}' is invalid: {error}", row.id))
        })?;

        Ok(Self {
            id: RoleId::from_uuid(row.id),
            name,
        })
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| read_error(error, "list roles"))?
            .into_iter()
            .map(RoleRecord::try_from)
            .collect()
    }

    async fn find_role_by_name(&self, name: &RoleName) -> AppResult<Option<RoleRecord>> {
        sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| read_error(error, "find role by name"))?
            .map(RoleRecord::try_from)
            .transpose()
    }

    async fn create_role(&self, name: &RoleName) -> AppResult<RoleRecord> {
        let role = RoleRecord {
            id: RoleId::new(),
            name: name.clone(),
        };

        sqlx::query("INSERT INTO roles (id, name) VALUES ($1, $2)")
            .bind(role.id.as_uuid())
            .bind(role.name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| write_error(error, "create role"))?;

        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| write_error(error, "delete role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, "assign role"))?;

        Ok(())
    }

    async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id.as_uuid())
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| write_error(error, "unassign role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_role_names_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleName>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT roles.name
            FROM user_roles
            INNER JOIN roles ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| read_error(error, "list roles for user"))?;

        names
            .iter()
            .map(|name| {
                RoleName::new(name).map_err(|error| {
                    AppError::Internal(format!("stored role name '{name}' is invalid: {error}"))
                })
            })
            .collect()
    }
}
