//! Ports and inputs for the leave taxonomy store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dressrosa_core::AppResult;
use dressrosa_domain::{
    LeaveCode, LeavePolicy, LeavePolicyId, LeavePolicyTerms, LeaveSubtype, LeaveSubtypeId,
    LeaveType, LeaveTypeId,
};

/// Sibling set within which a code must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeScope {
    /// All leave types.
    LeaveType,
    /// Subtypes of one leave type.
    LeaveSubtype(LeaveTypeId),
    /// All leave policies.
    LeavePolicy,
}

impl CodeScope {
    /// Describes the scope for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::LeaveType => "leave type".to_owned(),
            Self::LeaveSubtype(parent) => format!("leave subtype of type '{parent}'"),
            Self::LeavePolicy => "leave policy".to_owned(),
        }
    }
}

/// Optional parent filters for policy listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePolicyFilter {
    /// Only policies of this leave type.
    pub leave_type_id: Option<LeaveTypeId>,
    /// Only policies narrowed to this subtype.
    pub leave_subtype_id: Option<LeaveSubtypeId>,
}

impl LeavePolicyFilter {
    /// Returns whether the policy passes every set filter.
    #[must_use]
    pub fn matches(&self, policy: &LeavePolicy) -> bool {
        self.leave_type_id
            .is_none_or(|leave_type_id| policy.leave_type_id() == leave_type_id)
            && self
                .leave_subtype_id
                .is_none_or(|subtype_id| policy.leave_subtype_id() == Some(subtype_id))
    }
}

/// Input for creating or replacing a leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeInput {
    /// Code, normalized before use.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Active flag.
    pub is_active: bool,
}

/// Input for creating or replacing a leave subtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSubtypeInput {
    /// Parent leave type.
    pub leave_type_id: LeaveTypeId,
    /// Code, normalized before use.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Active flag.
    pub is_active: bool,
}

/// Input for creating or replacing a leave policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeavePolicyInput {
    /// Code, normalized before use.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Leave type the policy applies to.
    pub leave_type_id: LeaveTypeId,
    /// Optional subtype, which must belong to `leave_type_id`.
    pub leave_subtype_id: Option<LeaveSubtypeId>,
    /// Entitlement and validity terms.
    #[serde(flatten)]
    pub terms: LeavePolicyTerms,
    /// Active flag.
    pub is_active: bool,
}

/// Read side of the taxonomy store plus the entry point for transactions.
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// Opens a transaction. Dropping it without `commit` discards its writes.
    async fn begin(&self) -> AppResult<Box<dyn TaxonomyTransaction>>;

    /// Lists leave types ordered by creation.
    async fn list_leave_types(&self) -> AppResult<Vec<LeaveType>>;

    /// Lists subtypes ordered by creation, optionally of one type.
    async fn list_leave_subtypes(
        &self,
        leave_type_id: Option<LeaveTypeId>,
    ) -> AppResult<Vec<LeaveSubtype>>;

    /// Lists policies ordered by creation that pass the filter.
    async fn list_leave_policies(&self, filter: &LeavePolicyFilter) -> AppResult<Vec<LeavePolicy>>;

    /// Finds a leave type by id.
    async fn find_leave_type(&self, id: LeaveTypeId) -> AppResult<Option<LeaveType>>;

    /// Finds a leave type by normalized code.
    async fn find_leave_type_by_code(&self, code: &LeaveCode) -> AppResult<Option<LeaveType>>;

    /// Finds a leave subtype by id.
    async fn find_leave_subtype(&self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>>;

    /// Finds a leave policy by id.
    async fn find_leave_policy(&self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>>;
}

/// Unit of work over the taxonomy store.
///
/// All checks and writes of one mutation run through the same transaction so
/// concurrent writers cannot interleave between a check and its write.
#[async_trait]
pub trait TaxonomyTransaction: Send {
    /// Finds the id of the entity holding `code` in `scope`.
    async fn find_id_by_code(&mut self, scope: CodeScope, code: &LeaveCode)
    -> AppResult<Option<Uuid>>;

    /// Finds a leave type by id.
    async fn find_leave_type(&mut self, id: LeaveTypeId) -> AppResult<Option<LeaveType>>;

    /// Finds a leave subtype by id.
    async fn find_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>>;

    /// Finds a leave policy by id.
    async fn find_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>>;

    /// Inserts a leave type.
    async fn insert_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()>;

    /// Overwrites a leave type.
    async fn update_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()>;

    /// Deletes a leave type with its subtypes, detaching policies from those subtypes.
    async fn delete_leave_type(&mut self, id: LeaveTypeId) -> AppResult<bool>;

    /// Inserts a leave subtype.
    async fn insert_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()>;

    /// Overwrites a leave subtype.
    async fn update_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()>;

    /// Deletes a leave subtype, detaching policies that reference it.
    async fn delete_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<bool>;

    /// Inserts a leave policy.
    async fn insert_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()>;

    /// Overwrites a leave policy.
    async fn update_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()>;

    /// Deletes a leave policy.
    async fn delete_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<bool>;

    /// Counts policies narrowed to the subtype.
    async fn count_policies_for_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<u64>;

    /// Makes the transaction's writes visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
