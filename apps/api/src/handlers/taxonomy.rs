use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use dressrosa_application::{Credential, LeavePolicyFilter};
use dressrosa_core::AppResult;
use dressrosa_domain::{LeavePolicyId, LeaveSubtypeId, LeaveTypeId};

use crate::dto::{
    LeavePolicyListQuery, LeavePolicyRequest, LeavePolicyResponse, LeaveSubtypeListQuery,
    LeaveSubtypeRequest, LeaveSubtypeResponse, LeaveTypeRequest, LeaveTypeResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::require_hr_or_admin;

mod leave_policies;
mod leave_subtypes;
mod leave_types;

pub use leave_policies::{
    create_leave_policy_handler, delete_leave_policy_handler, get_leave_policy_handler,
    list_leave_policies_handler, update_leave_policy_handler,
};
pub use leave_subtypes::{
    create_leave_subtype_handler, delete_leave_subtype_handler, get_leave_subtype_handler,
    list_leave_subtypes_handler, update_leave_subtype_handler,
};
pub use leave_types::{
    create_leave_type_handler, delete_leave_type_handler, get_leave_type_handler,
    list_leave_types_handler, update_leave_type_handler,
};

/// Parses an optional id filter; blank values mean "no filter".
fn optional_id<T>(
    value: Option<String>,
    parse: impl Fn(&str) -> AppResult<T>,
) -> AppResult<Option<T>> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(|value| parse(value.as_str()))
        .transpose()
}
