//! Leave taxonomy store: leave types, their subtypes and leave policies.
//!
//! Every mutation runs its checks and writes inside one [`TaxonomyTransaction`].

use std::sync::Arc;

use chrono::Utc;

use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{
    LeaveCode, LeavePolicy, LeavePolicyId, LeaveSubtype, LeaveSubtypeId, LeaveType, LeaveTypeId,
};

use crate::{
    CodeScope, LeavePolicyFilter, LeavePolicyInput, LeaveSubtypeInput, LeaveTypeInput,
    TaxonomyRepository, TaxonomyTransaction,
};

/// Application service for the leave taxonomy.
#[derive(Clone)]
pub struct TaxonomyService {
    repository: Arc<dyn TaxonomyRepository>,
}

impl TaxonomyService {
    /// Creates a new taxonomy service.
    #[must_use]
    pub fn new(repository: Arc<dyn TaxonomyRepository>) -> Self {
        Self { repository }
    }
}

mod integrity;
mod leave_policies;
mod leave_subtypes;
mod leave_types;

pub(crate) use integrity::{ensure_code_available, require_leave_type, require_subtype_of};
