use super::*;

impl TaxonomyService {
    /// Lists leave policies ordered by creation that pass the filter.
    pub async fn list_leave_policies(
        &self,
        filter: LeavePolicyFilter,
    ) -> AppResult<Vec<LeavePolicy>> {
        self.repository.list_leave_policies(&filter).await
    }

    /// Returns one leave policy.
    pub async fn get_leave_policy(&self, id: LeavePolicyId) -> AppResult<LeavePolicy> {
        self.repository
            .find_leave_policy(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave policy '{id}' does not exist")))
    }

    /// Creates a policy for an existing type and optional subtype of that type.
    pub async fn create_leave_policy(&self, input: LeavePolicyInput) -> AppResult<LeavePolicy> {
        let policy = LeavePolicy::new(
            LeavePolicyId::new(),
            input.code,
            input.name,
            input.leave_type_id,
            input.leave_subtype_id,
            input.terms,
            input.is_active,
            Utc::now(),
        )?;

        let mut transaction = self.repository.begin().await?;
        check_policy_references(transaction.as_mut(), &policy).await?;
        ensure_code_available(
            transaction.as_mut(),
            CodeScope::LeavePolicy,
            policy.code(),
            None,
        )
        .await?;
        transaction.insert_leave_policy(&policy).await?;
        transaction.commit().await?;

        tracing::info!(id = %policy.id(), code = %policy.code(), "created leave policy");
        Ok(policy)
    }

    /// Replaces the mutable fields of a policy.
    pub async fn update_leave_policy(
        &self,
        id: LeavePolicyId,
        input: LeavePolicyInput,
    ) -> AppResult<LeavePolicy> {
        let mut transaction = self.repository.begin().await?;
        let existing = transaction
            .find_leave_policy(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave policy '{id}' does not exist")))?;

        let policy = LeavePolicy::new(
            id,
            input.code,
            input.name,
            input.leave_type_id,
            input.leave_subtype_id,
            input.terms,
            input.is_active,
            existing.created_at(),
        )?;

        check_policy_references(transaction.as_mut(), &policy).await?;
        ensure_code_available(
            transaction.as_mut(),
            CodeScope::LeavePolicy,
            policy.code(),
            Some(id.as_uuid()),
        )
        .await?;
        transaction.update_leave_policy(&policy).await?;
        transaction.commit().await?;

        tracing::info!(id = %id, code = %policy.code(), "updated leave policy");
        Ok(policy)
    }

    /// Deletes a policy.
    pub async fn delete_leave_policy(&self, id: LeavePolicyId) -> AppResult<()> {
        let mut transaction = self.repository.begin().await?;
        if !transaction.delete_leave_policy(id).await? {
            return Err(AppError::NotFound(format!(
                "leave policy '{id}' does not exist"
            )));
        }
        transaction.commit().await?;

        tracing::info!(id = %id, "deleted leave policy");
        Ok(())
    }
}

async fn check_policy_references(
    transaction: &mut dyn TaxonomyTransaction,
    policy: &LeavePolicy,
) -> AppResult<()> {
    require_leave_type(transaction, policy.leave_type_id()).await?;
    if let Some(subtype_id) = policy.leave_subtype_id() {
        require_subtype_of(transaction, subtype_id, policy.leave_type_id()).await?;
    }

    Ok(())
}
