//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod identifiers;
mod leave_policy;
mod role;
mod taxonomy;
mod user;

pub use identifiers::{LeavePolicyId, LeaveSubtypeId, LeaveTypeId, RoleId, UserId};
pub use leave_policy::{LEAVE_POLICY_RULES_MAX_BYTES, LeavePolicy, LeavePolicyTerms};
pub use role::{RequiredRoles, RoleHierarchy, RoleName, WELL_KNOWN_ROLES};
pub use taxonomy::{
    CODE_MAX_CHARS, DESCRIPTION_MAX_CHARS, LeaveCode, LeaveSubtype, LeaveType, NAME_MAX_CHARS,
    POLICY_CODE_MAX_CHARS, normalize_optional_text,
};
pub use user::{
    EmailAddress, FULL_NAME_MAX_CHARS, FULL_NAME_MIN_CHARS, PASSWORD_MAX_LENGTH,
    PASSWORD_MIN_LENGTH, USERNAME_MAX_CHARS, USERNAME_MIN_CHARS, Username, normalize_full_name,
    validate_password,
};
