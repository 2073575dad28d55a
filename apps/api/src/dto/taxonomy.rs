use chrono::{DateTime, Utc};
use dressrosa_application::{LeavePolicyInput, LeaveSubtypeInput, LeaveTypeInput};
use dressrosa_domain::{
    LeavePolicy, LeavePolicyId, LeavePolicyTerms, LeaveSubtype, LeaveSubtypeId, LeaveType,
    LeaveTypeId,
};
use serde::{Deserialize, Serialize};

use super::default_active;

/// Incoming payload for leave type creation and replacement.
#[derive(Debug, Deserialize)]
pub struct LeaveTypeRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<LeaveTypeRequest> for LeaveTypeInput {
    fn from(value: LeaveTypeRequest) -> Self {
        Self {
            code: value.code,
            name: value.name,
            description: value.description,
            is_active: value.is_active,
        }
    }
}

/// API representation of a leave type.
#[derive(Debug, Serialize)]
pub struct LeaveTypeResponse {
    pub id: LeaveTypeId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LeaveType> for LeaveTypeResponse {
    fn from(value: LeaveType) -> Self {
        Self {
            id: value.id(),
            code: value.code().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            description: value.description().map(str::to_owned),
            is_active: value.is_active(),
            created_at: value.created_at(),
        }
    }
}

/// Incoming payload for leave subtype creation and replacement.
#[derive(Debug, Deserialize)]
pub struct LeaveSubtypeRequest {
    pub leave_type_id: LeaveTypeId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<LeaveSubtypeRequest> for LeaveSubtypeInput {
    fn from(value: LeaveSubtypeRequest) -> Self {
        Self {
            leave_type_id: value.leave_type_id,
            code: value.code,
            name: value.name,
            description: value.description,
            is_active: value.is_active,
        }
    }
}

/// API representation of a leave subtype.
#[derive(Debug, Serialize)]
pub struct LeaveSubtypeResponse {
    pub id: LeaveSubtypeId,
    pub leave_type_id: LeaveTypeId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LeaveSubtype> for LeaveSubtypeResponse {
    fn from(value: LeaveSubtype) -> Self {
        Self {
            id: value.id(),
            leave_type_id: value.leave_type_id(),
            code: value.code().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            description: value.description().map(str::to_owned),
            is_active: value.is_active(),
            created_at: value.created_at(),
        }
    }
}

/// Incoming payload for leave policy creation and replacement.
#[derive(Debug, Deserialize)]
pub struct LeavePolicyRequest {
    pub code: String,
    pub name: String,
    pub leave_type_id: LeaveTypeId,
    #[serde(default)]
    pub leave_subtype_id: Option<LeaveSubtypeId>,
    #[serde(flatten)]
    pub terms: LeavePolicyTerms,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<LeavePolicyRequest> for LeavePolicyInput {
    fn from(value: LeavePolicyRequest) -> Self {
        Self {
            code: value.code,
            name: value.name,
            leave_type_id: value.leave_type_id,
            leave_subtype_id: value.leave_subtype_id,
            terms: value.terms,
            is_active: value.is_active,
        }
    }
}

/// API representation of a leave policy.
#[derive(Debug, Serialize)]
pub struct LeavePolicyResponse {
    pub id: LeavePolicyId,
    pub code: String,
    pub name: String,
    pub leave_type_id: LeaveTypeId,
    pub leave_subtype_id: Option<LeaveSubtypeId>,
    #[serde(flatten)]
    pub terms: LeavePolicyTerms,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LeavePolicy> for LeavePolicyResponse {
    fn from(value: LeavePolicy) -> Self {
        Self {
            id: value.id(),
            code: value.code().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            leave_type_id: value.leave_type_id(),
            leave_subtype_id: value.leave_subtype_id(),
            terms: value.terms().clone(),
            is_active: value.is_active(),
            created_at: value.created_at(),
        }
    }
}

/// Query string of the subtype listing.
#[derive(Debug, Default, Deserialize)]
pub struct LeaveSubtypeListQuery {
    pub leave_type_id: Option<String>,
}

/// Query string of the policy listing.
#[derive(Debug, Default, Deserialize)]
pub struct LeavePolicyListQuery {
    pub leave_type_id: Option<String>,
    pub leave_subtype_id: Option<String>,
}
