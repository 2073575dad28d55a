//! PostgreSQL-backed taxonomy repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use dressrosa_application::{LeavePolicyFilter, TaxonomyRepository, TaxonomyTransaction};
use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{
    LeaveCode, LeavePolicy, LeavePolicyId, LeavePolicyTerms, LeaveSubtype, LeaveSubtypeId,
    LeaveType, LeaveTypeId,
};

use crate::postgres_errors::read_error;

/// PostgreSQL implementation of the taxonomy repository port.
#[derive(Clone)]
pub struct PostgresTaxonomyRepository {
    pool: PgPool,
}

impl PostgresTaxonomyRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LeaveTypeRow {
    id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveTypeRow> for LeaveType {
    type Error = AppError;

    fn try_from(row: LeaveTypeRow) -> Result<Self, Self::Error> {
        LeaveType::new(
            LeaveTypeId::from_uuid(row.id),
            row.code,
            row.name,
            row.description,
            row.is_active,
            row.created_at,
        )
        .map_err(|error| corrupt_row("leave type", row.id, error))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LeaveSubtypeRow {
    id: Uuid,
    leave_type_id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveSubtypeRow> for LeaveSubtype {
    type Error = AppError;

    fn try_from(row: LeaveSubtypeRow) -> Result<Self, Self::Error> {
        LeaveSubtype::new(
            LeaveSubtypeId::from_uuid(row.id),
            LeaveTypeId::from_uuid(row.leave_type_id),
            row.code,
            row.name,
            row.description,
            row.is_active,
            row.created_at,
        )
        .map_err(|error| corrupt_row("leave subtype", row.id, error))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LeavePolicyRow {
    id: Uuid,
    code: String,
    name: String,
    leave_type_id: Uuid,
    leave_subtype_id: Option<Uuid>,
    entitlement_days: Option<f64>,
    accrual_rate_per_month: Option<f64>,
    max_carryover_days: Option<f64>,
    effective_from: Option<NaiveDate>,
    effective_to: Option<NaiveDate>,
    rules: Option<serde_json::Value>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeavePolicyRow> for LeavePolicy {
    type Error = AppError;

    fn try_from(row: LeavePolicyRow) -> Result<Self, Self::Error> {
        let terms = LeavePolicyTerms {
            entitlement_days: row.entitlement_days,
            accrual_rate_per_month: row.accrual_rate_per_month,
            max_carryover_days: row.max_carryover_days,
            effective_from: row.effective_from,
            effective_to: row.effective_to,
            rules: row.rules,
        };

        LeavePolicy::new(
            LeavePolicyId::from_uuid(row.id),
            row.code,
            row.name,
            LeaveTypeId::from_uuid(row.leave_type_id),
            row.leave_subtype_id.map(LeaveSubtypeId::from_uuid),
            terms,
            row.is_active,
            row.created_at,
        )
        .map_err(|error| corrupt_row("leave policy", row.id, error))
    }
}

fn corrupt_row(what: &str, id: Uuid, error: AppError) -> AppError {
    AppError::Internal(format!("stored {what} '{id}' is invalid: {error}"))
}

/// Row lookups shared by the pool and open transactions.
async fn fetch_leave_type<'e>(
    executor: impl PgExecutor<'e>,
    id: LeaveTypeId,
    lock: bool,
) -> AppResult<Option<LeaveType>> {
    let query = if lock {
        r#"
        SELECT id, code, name, description, is_active, created_at
        FROM leave_types
        WHERE id = $1
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT id, code, name, description, is_active, created_at
        FROM leave_types
        WHERE id = $1
        "#
    };

    sqlx::query_as::<_, LeaveTypeRow>(query)
        .bind(id.as_uuid())
        .fetch_optional(executor)
        .await
        .map_err(|error| read_error(error, "find leave type"))?
        .map(LeaveType::try_from)
        .transpose()
}

async fn fetch_leave_subtype<'e>(
    executor: impl PgExecutor<'e>,
    id: LeaveSubtypeId,
    lock: bool,
) -> AppResult<Option<LeaveSubtype>> {
    let query = if lock {
        r#"
        SELECT id, leave_type_id, code, name, description, is_active, created_at
        FROM leave_subtypes
        WHERE id = $1
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT id, leave_type_id, code, name, description, is_active, created_at
        FROM leave_subtypes
        WHERE id = $1
        "#
    };

    sqlx::query_as::<_, LeaveSubtypeRow>(query)
        .bind(id.as_uuid())
        .fetch_optional(executor)
        .await
        .map_err(|error| read_error(error, "find leave subtype"))?
        .map(LeaveSubtype::try_from)
        .transpose()
}

async fn fetch_leave_policy<'e>(
    executor: impl PgExecutor<'e>,
    id: LeavePolicyId,
    lock: bool,
) -> AppResult<Option<LeavePolicy>> {
    let query = if lock {
        r#"
        SELECT id, code, name, leave_type_id, leave_subtype_id, entitlement_days,
               accrual_rate_per_month, max_carryover_days, effective_from, effective_to,
               rules, is_active, created_at
        FROM leave_policies
        WHERE id = $1
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT id, code, name, leave_type_id, leave_subtype_id, entitlement_days,
               accrual_rate_per_month, max_carryover_days, effective_from, effective_to,
               rules, is_active, created_at
        FROM leave_policies
        WHERE id = $1
        "#
    };

    sqlx::query_as::<_, LeavePolicyRow>(query)
        .bind(id.as_uuid())
        .fetch_optional(executor)
        .await
        .map_err(|error| read_error(error, "find leave policy"))?
        .map(LeavePolicy::try_from)
        .transpose()
}

#[async_trait]
impl TaxonomyRepository for PostgresTaxonomyRepository {
    async fn begin(&self) -> AppResult<Box<dyn TaxonomyTransaction>> {
        let transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start taxonomy transaction: {error}"))
        })?;

        Ok(Box::new(PostgresTaxonomyTransaction { transaction }))
    }

    async fn list_leave_types(&self) -> AppResult<Vec<LeaveType>> {
        sqlx::query_as::<_, LeaveTypeRow>(
            r#"
            SELECT id, code, name, description, is_active, created_at
            FROM leave_types
            ORDER BY created_at, sequence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| read_error(error, "list leave types"))?
        .into_iter()
        .map(LeaveType::try_from)
        .collect()
    }

    async fn list_leave_subtypes(
        &self,
        leave_type_id: Option<LeaveTypeId>,
    ) -> AppResult<Vec<LeaveSubtype>> {
        sqlx::query_as::<_, LeaveSubtypeRow>(
            r#"
            SELECT id, leave_type_id, code, name, description, is_active, created_at
            FROM leave_subtypes
            WHERE ($1::uuid IS NULL OR leave_type_id = $1)
            ORDER BY created_at, sequence
            "#,
        )
        .bind(leave_type_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| read_error(error, "list leave subtypes"))?
        .into_iter()
        .map(LeaveSubtype::try_from)
        .collect()
    }

    async fn list_leave_policies(&self, filter: &LeavePolicyFilter) -> AppResult<Vec<LeavePolicy>> {
        sqlx::query_as::<_, LeavePolicyRow>(
            r#"
            SELECT id, code, name, leave_type_id, leave_subtype_id, entitlement_days,
                   accrual_rate_per_month, max_carryover_days, effective_from, effective_to,
                   rules, is_active, created_at
            FROM leave_policies
            WHERE ($1::uuid IS NULL OR leave_type_id = $1)
              AND ($2::uuid IS NULL OR leave_subtype_id = $2)
            ORDER BY created_at, sequence
            "#,
        )
        .bind(filter.leave_type_id.map(|id| id.as_uuid()))
        .bind(filter.leave_subtype_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| read_error(error, "list leave policies"))?
        .into_iter()
        .map(LeavePolicy::try_from)
        .collect()
    }

    async fn find_leave_type(&self, id: LeaveTypeId) -> AppResult<Option<LeaveType>> {
        fetch_leave_type(&self.pool, id, false).await
    }

    async fn find_leave_type_by_code(&self, code: &LeaveCode) -> AppResult<Option<LeaveType>> {
        sqlx::query_as::<_, LeaveTypeRow>(
            r#"
            SELECT id, code, name, description, is_active, created_at
            FROM leave_types
            WHERE code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| read_error(error, "find leave type by code"))?
        .map(LeaveType::try_from)
        .transpose()
    }

    async fn find_leave_subtype(&self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>> {
        fetch_leave_subtype(&self.pool, id, false).await
    }

    async fn find_leave_policy(&self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>> {
        fetch_leave_policy(&self.pool, id, false).await
    }
}

struct PostgresTaxonomyTransaction {
    transaction: sqlx::Transaction<'static, sqlx::Postgres>,
}

mod transaction;

#[cfg(test)]
mod tests;
