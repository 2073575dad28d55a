use uuid::Uuid;

use super::*;

/// Fails with `AlreadyExists` when another entity holds `code` in `scope`.
///
/// `exclude` is the id of the entity being updated, whose own row never conflicts.
pub(crate) async fn ensure_code_available(
    transaction: &mut dyn TaxonomyTransaction,
    scope: CodeScope,
    code: &LeaveCode,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    match transaction.find_id_by_code(scope, code).await? {
        Some(holder) if Some(holder) != exclude => Err(AppError::AlreadyExists(format!(
            "{} code '{code}' already exists",
            scope.describe()
        ))),
        _ => Ok(()),
    }
}

/// Loads the parent type or fails with `ParentNotFound`.
pub(crate) async fn require_leave_type(
    transaction: &mut dyn TaxonomyTransaction,
    leave_type_id: LeaveTypeId,
) -> AppResult<LeaveType> {
    transaction
        .find_leave_type(leave_type_id)
        .await?
        .ok_or_else(|| {
            AppError::ParentNotFound(format!("leave type '{leave_type_id}' does not exist"))
        })
}

/// Checks that `subtype_id` exists and belongs to `leave_type_id`.
pub(crate) async fn require_subtype_of(
    transaction: &mut dyn TaxonomyTransaction,
    subtype_id: LeaveSubtypeId,
    leave_type_id: LeaveTypeId,
) -> AppResult<LeaveSubtype> {
    let subtype = transaction
        .find_leave_subtype(subtype_id)
        .await?
        .ok_or_else(|| {
            AppError::ParentNotFound(format!("leave subtype '{subtype_id}' does not exist"))
        })?;

    if subtype.leave_type_id() != leave_type_id {
        return Err(AppError::SubtypeMismatch(format!(
            "leave subtype '{}' belongs to leave type '{}', not '{leave_type_id}'",
            subtype.code(),
            subtype.leave_type_id()
        )));
    }

    Ok(subtype)
}
