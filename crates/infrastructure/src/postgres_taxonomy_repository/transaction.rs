use dressrosa_application::CodeScope;

use crate::postgres_errors::write_error;

use super::*;

#[async_trait]
impl TaxonomyTransaction for PostgresTaxonomyTransaction {
    async fn find_id_by_code(
        &mut self,
        scope: CodeScope,
        code: &LeaveCode,
    ) -> AppResult<Option<Uuid>> {
        let query = match scope {
            CodeScope::LeaveType => sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM leave_types WHERE code = $1",
            )
            .bind(code.as_str()),
            CodeScope::LeaveSubtype(parent) => sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM leave_subtypes WHERE code = $1 AND leave_type_id = $2",
            )
            .bind(code.as_str())
            .bind(parent.as_uuid()),
            CodeScope::LeavePolicy => sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM leave_policies WHERE code = $1",
            )
            .bind(code.as_str()),
        };

        query
            .fetch_optional(&mut *self.transaction)
            .await
            .map_err(|error| read_error(error, &format!("look up {}", scope.describe())))
    }

    async fn find_leave_type(&mut self, id: LeaveTypeId) -> AppResult<Option<LeaveType>> {
        fetch_leave_type(&mut *self.transaction, id, true).await
    }

    async fn find_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>> {
        fetch_leave_subtype(&mut *self.transaction, id, true).await
    }

    async fn find_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>> {
        fetch_leave_policy(&mut *self.transaction, id, true).await
    }

    async fn insert_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO leave_types (id, code, name, description, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(leave_type.id().as_uuid())
        .bind(leave_type.code().as_str())
        .bind(leave_type.name().as_str())
        .bind(leave_type.description())
        .bind(leave_type.is_active())
        .bind(leave_type.created_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| write_error(error, "insert leave type"))?;

        Ok(())
    }

    async fn update_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE leave_types
            SET code = $2, name = $3, description = $4, is_active = $5
            WHERE id = $1
            "#,
        )
        .bind(leave_type.id().as_uuid())
        .bind(leave_type.code().as_str())
        .bind(leave_type.name().as_str())
        .bind(leave_type.description())
        .bind(leave_type.is_active())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| write_error(error, "update leave type"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "leave type '{}' does not exist",
                leave_type.id()
            )));
        }

        Ok(())
    }

    async fn delete_leave_type(&mut self, id: LeaveTypeId) -> AppResult<bool> {
        // Subtypes cascade; their policies are detached by ON DELETE SET NULL.
        let result = sqlx::query("DELETE FROM leave_types WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.transaction)
            .await
            .map_err(|error| write_error(error, "delete leave type"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO leave_subtypes (
                id, leave_type_id, code, name, description, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(subtype.id().as_uuid())
        .bind(subtype.leave_type_id().as_uuid())
        .bind(subtype.code().as_str())
        .bind(subtype.name().as_str())
        .bind(subtype.description())
        .bind(subtype.is_active())
        .bind(subtype.created_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| write_error(error, "insert leave subtype"))?;

        Ok(())
    }

    async fn update_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE leave_subtypes
            SET leave_type_id = $2, code = $3, name = $4, description = $5, is_active = $6
            WHERE id = $1
            "#,
        )
        .bind(subtype.id().as_uuid())
        .bind(subtype.leave_type_id().as_uuid())
        .bind(subtype.code().as_str())
        .bind(subtype.name().as_str())
        .bind(subtype.description())
        .bind(subtype.is_active())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| write_error(error, "update leave subtype"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "leave subtype '{}' does not exist",
                subtype.id()
            )));
        }

        Ok(())
    }

    async fn delete_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM leave_subtypes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.transaction)
            .await
            .map_err(|error| write_error(error, "delete leave subtype"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()> {
        let terms = policy.terms();
        sqlx::query(
            r#"
            INSERT INTO leave_policies (
                id, code, name, leave_type_id, leave_subtype_id, entitlement_days,
                accrual_rate_per_month, max_carryover_days, effective_from, effective_to,
                rules, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(policy.id().as_uuid())
        .bind(policy.code().as_str())
        .bind(policy.name().as_str())
        .bind(policy.leave_type_id().as_uuid())
        .bind(policy.leave_subtype_id().map(|id| id.as_uuid()))
        .bind(terms.entitlement_days)
        .bind(terms.accrual_rate_per_month)
        .bind(terms.max_carryover_days)
        .bind(terms.effective_from)
        .bind(terms.effective_to)
        .bind(terms.rules.clone())
        .bind(policy.is_active())
        .bind(policy.created_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| write_error(error, "insert leave policy"))?;

        Ok(())
    }

    async fn update_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()> {
        let terms = policy.terms();
        let result = sqlx::query(
            r#"
            UPDATE leave_policies
            SET code = $2,
                name = $3,
                leave_type_id = $4,
                leave_subtype_id = $5,
                entitlement_days = $6,
                accrual_rate_per_month = $7,
                max_carryover_days = $8,
                effective_from = $9,
                effective_to = $10,
                rules = $11,
                is_active = $12
            WHERE id = $1
            "#,
        )
        .bind(policy.id().as_uuid())
        .bind(policy.code().as_str())
        .bind(policy.name().as_str())
        .bind(policy.leave_type_id().as_uuid())
        .bind(policy.leave_subtype_id().map(|id| id.as_uuid()))
        .bind(terms.entitlement_days)
        .bind(terms.accrual_rate_per_month)
        .bind(terms.max_carryover_days)
        .bind(terms.effective_from)
        .bind(terms.effective_to)
        .bind(terms.rules.clone())
        .bind(policy.is_active())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| write_error(error, "update leave policy"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "leave policy '{}' does not exist",
                policy.id()
            )));
        }

        Ok(())
    }

    async fn delete_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM leave_policies WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.transaction)
            .await
            .map_err(|error| write_error(error, "delete leave policy"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_policies_for_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leave_policies WHERE leave_subtype_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_one(&mut *self.transaction)
        .await
        .map_err(|error| read_error(error, "count leave policies for subtype"))?;

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid policy count {count}: {error}")))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.transaction
            .commit()
            .await
            .map_err(|error| write_error(error, "commit taxonomy transaction"))
    }
}
