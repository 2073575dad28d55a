use chrono::Utc;

use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{
    LeaveCode, LeavePolicy, LeavePolicyId, LeaveSubtype, LeaveSubtypeId, LeaveType, LeaveTypeId,
};

use crate::{CodeScope, TaxonomyTransaction};

use super::*;

impl CatalogSeeder {
    /// Upserts every catalog entry in one transaction.
    ///
    /// Existing entries are matched by code, overwritten with catalog values and
    /// reactivated. Entries whose parent code does not resolve, or whose own
    /// fields fail validation, are skipped with a warning. Store entries absent
    /// from the catalog are left alone.
    pub async fn reconcile_defaults(&self, catalog: &TaxonomyCatalog) -> AppResult<SeedReport> {
        let mut transaction = self.repository.begin().await?;
        let mut report = SeedReport::default();

        for entry in &catalog.leave_types {
            let outcome =
                reconcile_leave_type(transaction.as_mut(), entry, &mut report.leave_types).await;
            skip_invalid("leave type", &entry.code, outcome, &mut report.leave_types)?;
        }

        for entry in &catalog.leave_subtypes {
            let outcome =
                reconcile_leave_subtype(transaction.as_mut(), entry, &mut report.leave_subtypes)
                    .await;
            skip_invalid("leave subtype", &entry.code, outcome, &mut report.leave_subtypes)?;
        }

        for entry in &catalog.leave_policies {
            let outcome =
                reconcile_leave_policy(transaction.as_mut(), entry, &mut report.leave_policies)
                    .await;
            skip_invalid("leave policy", &entry.code, outcome, &mut report.leave_policies)?;
        }

        transaction.commit().await?;

        tracing::info!(
            created = report.total_created(),
            skipped = report.total_skipped(),
            "reconciled leave catalog"
        );
        Ok(report)
    }
}

/// Counts an entry rejected by validation as skipped; other errors abort the run.
fn skip_invalid(
    kind: &str,
    code: &str,
    outcome: AppResult<()>,
    counts: &mut SeedCounts,
) -> AppResult<()> {
    match outcome {
        Err(AppError::Validation(reason)) => {
            tracing::warn!(code, reason = reason.as_str(), "skipping invalid catalog {kind}");
            counts.skipped += 1;
            Ok(())
        }
        other => other,
    }
}

fn changed<T: PartialEq>(existing: &T, desired: &T, counts: &mut SeedCounts) -> bool {
    if existing == desired {
        counts.unchanged += 1;
        false
    } else {
        counts.updated += 1;
        true
    }
}

async fn resolve_leave_type(
    transaction: &mut dyn TaxonomyTransaction,
    code: &str,
) -> AppResult<Option<LeaveTypeId>> {
    let Ok(code) = LeaveCode::new(code) else {
        return Ok(None);
    };

    Ok(transaction
        .find_id_by_code(CodeScope::LeaveType, &code)
        .await?
        .map(LeaveTypeId::from_uuid))
}

async fn resolve_leave_subtype(
    transaction: &mut dyn TaxonomyTransaction,
    leave_type_id: LeaveTypeId,
    code: &str,
) -> AppResult<Option<LeaveSubtypeId>> {
    let Ok(code) = LeaveCode::new(code) else {
        return Ok(None);
    };

    Ok(transaction
        .find_id_by_code(CodeScope::LeaveSubtype(leave_type_id), &code)
        .await?
        .map(LeaveSubtypeId::from_uuid))
}

fn vanished(kind: &str, code: &LeaveCode) -> AppError {
    AppError::Internal(format!("{kind} '{code}' vanished during catalog reconciliation"))
}

async fn reconcile_leave_type(
    transaction: &mut dyn TaxonomyTransaction,
    entry: &CatalogLeaveType,
    counts: &mut SeedCounts,
) -> AppResult<()> {
    let code = LeaveCode::new(&entry.code)?;

    let Some(id) = transaction
        .find_id_by_code(CodeScope::LeaveType, &code)
        .await?
        .map(LeaveTypeId::from_uuid)
    else {
        let created = LeaveType::new(
            LeaveTypeId::new(),
            code.as_str(),
            entry.name.as_str(),
            entry.description.clone(),
            true,
            Utc::now(),
        )?;
        transaction.insert_leave_type(&created).await?;
        counts.created += 1;
        return Ok(());
    };

    let existing = transaction
        .find_leave_type(id)
        .await?
        .ok_or_else(|| vanished("leave type", &code))?;
    let desired = LeaveType::new(
        id,
        code.as_str(),
        entry.name.as_str(),
        entry.description.clone(),
        true,
        existing.created_at(),
    )?;

    if changed(&existing, &desired, counts) {
        transaction.update_leave_type(&desired).await?;
    }
    Ok(())
}

async fn reconcile_leave_subtype(
    transaction: &mut dyn TaxonomyTransaction,
    entry: &CatalogLeaveSubtype,
    counts: &mut SeedCounts,
) -> AppResult<()> {
    let code = LeaveCode::new(&entry.code)?;

    let Some(leave_type_id) = resolve_leave_type(transaction, &entry.leave_type_code).await?
    else {
        tracing::warn!(
            code = %code,
            leave_type_code = entry.leave_type_code.as_str(),
            "skipping catalog leave subtype with unknown leave type"
        );
        counts.skipped += 1;
        return Ok(());
    };

    let Some(id) = transaction
        .find_id_by_code(CodeScope::LeaveSubtype(leave_type_id), &code)
        .await?
        .map(LeaveSubtypeId::from_uuid)
    else {
        let created = LeaveSubtype::new(
            LeaveSubtypeId::new(),
            leave_type_id,
            code.as_str(),
            entry.name.as_str(),
            entry.description.clone(),
            true,
            Utc::now(),
        )?;
        transaction.insert_leave_subtype(&created).await?;
        counts.created += 1;
        return Ok(());
    };

    let existing = transaction
        .find_leave_subtype(id)
        .await?
        .ok_or_else(|| vanished("leave subtype", &code))?;
    let desired = LeaveSubtype::new(
        id,
        leave_type_id,
        code.as_str(),
        entry.name.as_str(),
        entry.description.clone(),
        true,
        existing.created_at(),
    )?;

    if changed(&existing, &desired, counts) {
        transaction.update_leave_subtype(&desired).await?;
    }
    Ok(())
}

async fn reconcile_leave_policy(
    transaction: &mut dyn TaxonomyTransaction,
    entry: &CatalogLeavePolicy,
    counts: &mut SeedCounts,
) -> AppResult<()> {
    let code = LeaveCode::for_policy(&entry.code)?;

    let Some(leave_type_id) = resolve_leave_type(transaction, &entry.leave_type_code).await?
    else {
        tracing::warn!(
            code = %code,
            leave_type_code = entry.leave_type_code.as_str(),
            "skipping catalog leave policy with unknown leave type"
        );
        counts.skipped += 1;
        return Ok(());
    };

    let leave_subtype_id = match entry.leave_subtype_code.as_deref() {
        None => None,
        Some(subtype_code) => {
            let Some(subtype_id) =
                resolve_leave_subtype(transaction, leave_type_id, subtype_code).await?
            else {
                tracing::warn!(
                    code = %code,
                    leave_type_code = entry.leave_type_code.as_str(),
                    leave_subtype_code = subtype_code,
                    "skipping catalog leave policy with unknown leave subtype"
                );
                counts.skipped += 1;
                return Ok(());
            };
            Some(subtype_id)
        }
    };

    let Some(id) = transaction
        .find_id_by_code(CodeScope::LeavePolicy, &code)
        .await?
        .map(LeavePolicyId::from_uuid)
    else {
        let created = LeavePolicy::new(
            LeavePolicyId::new(),
            code.as_str(),
            entry.name.as_str(),
            leave_type_id,
            leave_subtype_id,
            entry.terms.clone(),
            true,
            Utc::now(),
        )?;
        transaction.insert_leave_policy(&created).await?;
        counts.created += 1;
        return Ok(());
    };

    let existing = transaction
        .find_leave_policy(id)
        .await?
        .ok_or_else(|| vanished("leave policy", &code))?;
    let desired = LeavePolicy::new(
        id,
        code.as_str(),
        entry.name.as_str(),
        leave_type_id,
        leave_subtype_id,
        entry.terms.clone(),
        true,
        existing.created_at(),
    )?;

    if changed(&existing, &desired, counts) {
        transaction.update_leave_policy(&desired).await?;
    }
    Ok(())
}
