use super::*;

impl TaxonomyService {
    /// Lists leave types ordered by creation.
    pub async fn list_leave_types(&self) -> AppResult<Vec<LeaveType>> {
        self.repository.list_leave_types().await
    }

    /// Returns one leave type.
    pub async fn get_leave_type(&self, id: LeaveTypeId) -> AppResult<LeaveType> {
        self.repository
            .find_leave_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave type '{id}' does not exist")))
    }

    /// Finds a leave type by code after normalizing it.
    pub async fn find_leave_type_by_code(&self, code: &str) -> AppResult<Option<LeaveType>> {
        let code = LeaveCode::new(code)?;
        self.repository.find_leave_type_by_code(&code).await
    }

    /// Creates a leave type with a globally unique code.
    pub async fn create_leave_type(&self, input: LeaveTypeInput) -> AppResult<LeaveType> {
        let leave_type = LeaveType::new(
            LeaveTypeId::new(),
            input.code,
            input.name,
            input.description,
            input.is_active,
            Utc::now(),
        )?;

        let mut transaction = self.repository.begin().await?;
        ensure_code_available(
            transaction.as_mut(),
            CodeScope::LeaveType,
            leave_type.code(),
            None,
        )
        .await?;
        transaction.insert_leave_type(&leave_type).await?;
        transaction.commit().await?;

        tracing::info!(id = %leave_type.id(), code = %leave_type.code(), "created leave type");
        Ok(leave_type)
    }

    /// Replaces the mutable fields of a leave type.
    pub async fn update_leave_type(
        &self,
        id: LeaveTypeId,
        input: LeaveTypeInput,
    ) -> AppResult<LeaveType> {
        let mut transaction = self.repository.begin().await?;
        let existing = transaction
            .find_leave_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave type '{id}' does not exist")))?;

        let leave_type = LeaveType::new(
            id,
            input.code,
            input.name,
            input.description,
            input.is_active,
            existing.created_at(),
        )?;

        ensure_code_available(
            transaction.as_mut(),
            CodeScope::LeaveType,
            leave_type.code(),
            Some(id.as_uuid()),
        )
        .await?;
        transaction.update_leave_type(&leave_type).await?;
        transaction.commit().await?;

        tracing::info!(id = %id, code = %leave_type.code(), "updated leave type");
        Ok(leave_type)
    }

    /// Deletes a leave type and its subtypes; dependent policies lose their subtype.
    pub async fn delete_leave_type(&self, id: LeaveTypeId) -> AppResult<()> {
        let mut transaction = self.repository.begin().await?;
        if !transaction.delete_leave_type(id).await? {
            return Err(AppError::NotFound(format!(
                "leave type '{id}' does not exist"
            )));
        }
        transaction.commit().await?;

        tracing::info!(id = %id, "deleted leave type");
        Ok(())
    }
}
