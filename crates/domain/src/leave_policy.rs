use chrono::{DateTime, NaiveDate, Utc};
use dressrosa_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::taxonomy::bounded_name;
use crate::{LeaveCode, LeavePolicyId, LeaveSubtypeId, LeaveTypeId};

/// Maximum serialized size of a policy rules payload.
pub const LEAVE_POLICY_RULES_MAX_BYTES: usize = 2000;

/// Entitlement, accrual and validity terms of a leave policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeavePolicyTerms {
    /// Days granted per period.
    pub entitlement_days: Option<f64>,
    /// Days accrued per month.
    pub accrual_rate_per_month: Option<f64>,
    /// Days that may be carried into the next period.
    pub max_carryover_days: Option<f64>,
    /// First day the policy applies.
    pub effective_from: Option<NaiveDate>,
    /// Last day the policy applies.
    pub effective_to: Option<NaiveDate>,
    /// Free-form rules evaluated by downstream consumers.
    pub rules: Option<Value>,
}

impl LeavePolicyTerms {
    /// Checks numeric bounds, date order and the rules payload size.
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("entitlement_days", self.entitlement_days),
            ("accrual_rate_per_month", self.accrual_rate_per_month),
            ("max_carryover_days", self.max_carryover_days),
        ] {
            if let Some(value) = value
                && (!value.is_finite() || value < 0.0)
            {
                return Err(AppError::Validation(format!(
                    "{field} must be a finite, non-negative number"
                )));
            }
        }

        if let (Some(from), Some(to)) = (self.effective_from, self.effective_to)
            && from > to
        {
            return Err(AppError::Validation(format!(
                "effective_from {from} must not be after effective_to {to}"
            )));
        }

        if let Some(rules) = &self.rules {
            let size = serde_json::to_vec(rules)
                .map_err(|error| {
                    AppError::Validation(format!("rules payload is not serializable: {error}"))
                })?
                .len();
            if size > LEAVE_POLICY_RULES_MAX_BYTES {
                return Err(AppError::Validation(format!(
                    "rules payload must not exceed {LEAVE_POLICY_RULES_MAX_BYTES} bytes"
                )));
            }
        }

        Ok(())
    }
}

/// Entitlement rule set attached to a leave type and optionally one of its subtypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LeavePolicyFields")]
pub struct LeavePolicy {
    id: LeavePolicyId,
    code: LeaveCode,
    name: NonEmptyString,
    leave_type_id: LeaveTypeId,
    leave_subtype_id: Option<LeaveSubtypeId>,
    terms: LeavePolicyTerms,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl LeavePolicy {
    /// Creates a validated leave policy.
    ///
    /// Subtype ownership is a cross-entity rule and is checked by the store.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LeavePolicyId,
        code: impl AsRef<str>,
        name: impl Into<String>,
        leave_type_id: LeaveTypeId,
        leave_subtype_id: Option<LeaveSubtypeId>,
        terms: LeavePolicyTerms,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        terms.validate()?;

        Ok(Self {
            id,
            code: LeaveCode::for_policy(code)?,
            name: bounded_name(name)?,
            leave_type_id,
            leave_subtype_id,
            terms,
            is_active,
            created_at,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> LeavePolicyId {
        self.id
    }

    /// Returns the globally unique code.
    #[must_use]
    pub fn code(&self) -> &LeaveCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the leave type the policy applies to.
    #[must_use]
    pub fn leave_type_id(&self) -> LeaveTypeId {
        self.leave_type_id
    }

    /// Returns the subtype the policy is narrowed to, if any.
    #[must_use]
    pub fn leave_subtype_id(&self) -> Option<LeaveSubtypeId> {
        self.leave_subtype_id
    }

    /// Returns the policy terms.
    #[must_use]
    pub fn terms(&self) -> &LeavePolicyTerms {
        &self.terms
    }

    /// Returns whether the policy is in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the policy was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns a copy detached from its subtype, used when that subtype is deleted.
    #[must_use]
    pub fn without_subtype(&self) -> Self {
        Self {
            leave_subtype_id: None,
            ..self.clone()
        }
    }
}

#[derive(Deserialize)]
struct LeavePolicyFields {
    id: LeavePolicyId,
    code: String,
    name: String,
    leave_type_id: LeaveTypeId,
    leave_subtype_id: Option<LeaveSubtypeId>,
    terms: LeavePolicyTerms,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeavePolicyFields> for LeavePolicy {
    type Error = AppError;

    fn try_from(fields: LeavePolicyFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.id,
            fields.code,
            fields.name,
            fields.leave_type_id,
            fields.leave_subtype_id,
            fields.terms,
            fields.is_active,
            fields.created_at,
        )
    }
}
