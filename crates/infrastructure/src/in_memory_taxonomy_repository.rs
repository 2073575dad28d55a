use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dressrosa_application::{
    CodeScope, LeavePolicyFilter, TaxonomyRepository, TaxonomyTransaction,
};
use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{
    LeaveCode, LeavePolicy, LeavePolicyId, LeaveSubtype, LeaveSubtypeId, LeaveType, LeaveTypeId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Stored value tagged with its insertion sequence.
#[derive(Debug, Clone)]
struct Sequenced<T> {
    sequence: u64,
    value: T,
}

#[derive(Debug, Clone, Default)]
struct TaxonomyTables {
    next_sequence: u64,
    leave_types: HashMap<LeaveTypeId, Sequenced<LeaveType>>,
    leave_subtypes: HashMap<LeaveSubtypeId, Sequenced<LeaveSubtype>>,
    leave_policies: HashMap<LeavePolicyId, Sequenced<LeavePolicy>>,
}

impl TaxonomyTables {
    fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }
}

/// Orders by creation time, then insertion sequence.
fn ordered<'a, T: Clone + 'a>(
    values: impl Iterator<Item = &'a Sequenced<T>>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut values: Vec<&Sequenced<T>> = values.collect();
    values.sort_by_key(|stored| (created_at(&stored.value), stored.sequence));
    values.into_iter().map(|stored| stored.value.clone()).collect()
}

/// In-memory taxonomy repository.
///
/// A transaction holds the store lock until it is committed or dropped and
/// works on a private copy of the tables, so writers are fully serialized.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaxonomyRepository {
    tables: Arc<Mutex<TaxonomyTables>>,
}

impl InMemoryTaxonomyRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryTaxonomyRepository {
    async fn begin(&self) -> AppResult<Box<dyn TaxonomyTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTaxonomyTransaction { guard, working }))
    }

    async fn list_leave_types(&self) -> AppResult<Vec<LeaveType>> {
        let tables = self.tables.lock().await;
        Ok(ordered(tables.leave_types.values(), LeaveType::created_at))
    }

    async fn list_leave_subtypes(
        &self,
        leave_type_id: Option<LeaveTypeId>,
    ) -> AppResult<Vec<LeaveSubtype>> {
        let tables = self.tables.lock().await;
        Ok(ordered(
            tables.leave_subtypes.values().filter(|stored| {
                leave_type_id.is_none_or(|parent| stored.value.leave_type_id() == parent)
            }),
            LeaveSubtype::created_at,
        ))
    }

    async fn list_leave_policies(&self, filter: &LeavePolicyFilter) -> AppResult<Vec<LeavePolicy>> {
        let tables = self.tables.lock().await;
        Ok(ordered(
            tables
                .leave_policies
                .values()
                .filter(|stored| filter.matches(&stored.value)),
            LeavePolicy::created_at,
        ))
    }

    async fn find_leave_type(&self, id: LeaveTypeId) -> AppResult<Option<LeaveType>> {
        let tables = self.tables.lock().await;
        Ok(tables.leave_types.get(&id).map(|stored| stored.value.clone()))
    }

    async fn find_leave_type_by_code(&self, code: &LeaveCode) -> AppResult<Option<LeaveType>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .leave_types
            .values()
            .find(|stored| stored.value.code() == code)
            .map(|stored| stored.value.clone()))
    }

    async fn find_leave_subtype(&self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .leave_subtypes
            .get(&id)
            .map(|stored| stored.value.clone()))
    }

    async fn find_leave_policy(&self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .leave_policies
            .get(&id)
            .map(|stored| stored.value.clone()))
    }
}

struct InMemoryTaxonomyTransaction {
    guard: OwnedMutexGuard<TaxonomyTables>,
    working: TaxonomyTables,
}

mod transaction;
