use super::*;

impl TaxonomyService {
    /// Lists leave subtypes ordered by creation, optionally of one type.
    pub async fn list_leave_subtypes(
        &self,
        leave_type_id: Option<LeaveTypeId>,
    ) -> AppResult<Vec<LeaveSubtype>> {
        self.repository.list_leave_subtypes(leave_type_id).await
    }

    /// Returns one leave subtype.
    pub async fn get_leave_subtype(&self, id: LeaveSubtypeId) -> AppResult<LeaveSubtype> {
        self.repository
            .find_leave_subtype(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave subtype '{id}' does not exist")))
    }

    /// Creates a subtype under an existing leave type.
    pub async fn create_leave_subtype(&self, input: LeaveSubtypeInput) -> AppResult<LeaveSubtype> {
        let subtype = LeaveSubtype::new(
            LeaveSubtypeId::new(),
            input.leave_type_id,
            input.code,
            input.name,
            input.description,
            input.is_active,
            Utc::now(),
        )?;

        let mut transaction = self.repository.begin().await?;
        require_leave_type(transaction.as_mut(), subtype.leave_type_id()).await?;
        ensure_code_available(
            transaction.as_mut(),
            CodeScope::LeaveSubtype(subtype.leave_type_id()),
            subtype.code(),
            None,
        )
        .await?;
        transaction.insert_leave_subtype(&subtype).await?;
        transaction.commit().await?;

        tracing::info!(
            id = %subtype.id(),
            leave_type_id = %subtype.leave_type_id(),
            code = %subtype.code(),
            "created leave subtype"
        );
        Ok(subtype)
    }

    /// Replaces the mutable fields of a subtype.
    ///
    /// Moving a subtype to another type is refused while policies reference it.
    pub async fn update_leave_subtype(
        &self,
        id: LeaveSubtypeId,
        input: LeaveSubtypeInput,
    ) -> AppResult<LeaveSubtype> {
        let mut transaction = self.repository.begin().await?;
        let existing = transaction
            .find_leave_subtype(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave subtype '{id}' does not exist")))?;

        let subtype = LeaveSubtype::new(
            id,
            input.leave_type_id,
            input.code,
            input.name,
            input.description,
            input.is_active,
            existing.created_at(),
        )?;

        require_leave_type(transaction.as_mut(), subtype.leave_type_id()).await?;

        if subtype.leave_type_id() != existing.leave_type_id() {
            let referencing = transaction.count_policies_for_subtype(id).await?;
            if referencing > 0 {
                return Err(AppError::SubtypeMismatch(format!(
                    "leave subtype '{}' is referenced by {referencing} policies of leave type '{}' and cannot move to another type",
                    existing.code(),
                    existing.leave_type_id()
                )));
            }
        }

        ensure_code_available(
            transaction.as_mut(),
            CodeScope::LeaveSubtype(subtype.leave_type_id()),
            subtype.code(),
            Some(id.as_uuid()),
        )
        .await?;
        transaction.update_leave_subtype(&subtype).await?;
        transaction.commit().await?;

        tracing::info!(
            id = %id,
            leave_type_id = %subtype.leave_type_id(),
            code = %subtype.code(),
            "updated leave subtype"
        );
        Ok(subtype)
    }

    /// Deletes a subtype; policies that referenced it keep their type only.
    pub async fn delete_leave_subtype(&self, id: LeaveSubtypeId) -> AppResult<()> {
        let mut transaction = self.repository.begin().await?;
        if !transaction.delete_leave_subtype(id).await? {
            return Err(AppError::NotFound(format!(
                "leave subtype '{id}' does not exist"
            )));
        }
        transaction.commit().await?;

        tracing::info!(id = %id, "deleted leave subtype");
        Ok(())
    }
}
