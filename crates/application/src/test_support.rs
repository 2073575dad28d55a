//! In-process fakes shared by the service tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{
    LeavePolicy, LeavePolicyId, LeaveSubtype, LeaveSubtypeId, LeaveType, LeaveTypeId, RoleId,
    RoleName, UserId,
};

use crate::{
    AccessTokenRepository, CodeScope, LeavePolicyFilter, PasswordHasher, RoleRecord,
    RoleRepository, TaxonomyRepository, TaxonomyTransaction, UserRecord, UserRepository,
};

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<Vec<UserRecord>>,
}

impl FakeUserRepository {
    pub(crate) async fn insert(&self, user: UserRecord) {
        self.users.lock().await.push(user);
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        let mut users = self.users.lock().await.clone();
        users.reverse();
        users.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(users)
    }

    async fn create_user(&self, user: UserRecord) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if users
            .iter()
            .any(|existing| existing.username == user.username || existing.email == user.email)
        {
            return Err(AppError::AlreadyExists("user already exists".to_owned()));
        }
        users.push(user);
        Ok(())
    }

    async fn update_user(&self, user: UserRecord) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        let Some(stored) = users.iter_mut().find(|existing| existing.id == user.id) else {
            return Ok(false);
        };
        *stored = user;
        Ok(true)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|user| user.id != user_id);
        let deleted = users.len() != before;
        for user in users.iter_mut() {
            if user.manager_id == Some(user_id) {
                user.manager_id = None;
            }
        }
        Ok(deleted)
    }
}

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    pub(crate) roles: Mutex<Vec<RoleRecord>>,
    pub(crate) assignments: Mutex<Vec<(UserId, RoleId)>>,
}

impl FakeRoleRepository {
    pub(crate) async fn grant(&self, user_id: UserId, name: &str) {
        let name = RoleName::new(name).unwrap_or_else(|_| unreachable!());
        let role = match self.find_role_by_name(&name).await {
            Ok(Some(role)) => role,
            _ => self
                .create_role(&name)
                .await
                .unwrap_or_else(|_| unreachable!()),
        };
        let _ = self.assign_role(user_id, role.id).await;
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        let mut roles = self.roles.lock().await.clone();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn find_role_by_name(&self, name: &RoleName) -> AppResult<Option<RoleRecord>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| &role.name == name)
            .cloned())
    }

    async fn create_role(&self, name: &RoleName) -> AppResult<RoleRecord> {
        let mut roles = self.roles.lock().await;
        if roles.iter().any(|role| &role.name == name) {
            return Err(AppError::AlreadyExists(format!("role '{name}' already exists")));
        }
        let role = RoleRecord {
            id: RoleId::new(),
            name: name.clone(),
        };
        roles.push(role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.id != role_id);
        self.assignments
            .lock()
            .await
            .retain(|(_, assigned)| *assigned != role_id);
        Ok(roles.len() != before)
    }

    async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut assignments = self.assignments.lock().await;
        if !assignments.contains(&(user_id, role_id)) {
            assignments.push((user_id, role_id));
        }
        Ok(())
    }

    async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let mut assignments = self.assignments.lock().await;
        let before = assignments.len();
        assignments.retain(|assignment| *assignment != (user_id, role_id));
        Ok(assignments.len() != before)
    }

    async fn list_role_names_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleName>> {
        let roles = self.roles.lock().await;
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|(assigned_user, _)| *assigned_user == user_id)
            .filter_map(|(_, role_id)| {
                roles
                    .iter()
                    .find(|role| role.id == *role_id)
                    .map(|role| role.name.clone())
            })
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeAccessTokenRepository {
    pub(crate) tokens: Mutex<HashMap<String, (UserId, DateTime<Utc>)>>,
}

#[async_trait]
impl AccessTokenRepository for FakeAccessTokenRepository {
    async fn store_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.tokens
            .lock()
            .await
            .insert(token_hash.to_owned(), (user_id, expires_at));
        Ok(())
    }

    async fn find_token_owner(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>> {
        Ok(self
            .tokens
            .lock()
            .await
            .get(token_hash)
            .and_then(|(user_id, expires_at)| (*expires_at > now).then_some(*user_id)))
    }

    async fn revoke_token(&self, token_hash: &str) -> AppResult<bool> {
        Ok(self.tokens.lock().await.remove(token_hash).is_some())
    }
}

/// Reversible "hash" so tests can assert on stored values.
pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

pub(crate) fn user_record(username: &str, is_active: bool) -> UserRecord {
    UserRecord {
        id: UserId::new(),
        username: username.to_owned(),
        email: format!("{username}@dressrosa.local"),
        full_name: format!("{username} full name"),
        password_hash: "hashed:Test123".to_owned(),
        is_active,
        manager_id: None,
        created_at: Utc::now(),
    }
}

#[derive(Clone, Default)]
struct TaxonomyState {
    leave_types: BTreeMap<LeaveTypeId, LeaveType>,
    leave_subtypes: BTreeMap<LeaveSubtypeId, LeaveSubtype>,
    leave_policies: BTreeMap<LeavePolicyId, LeavePolicy>,
}

/// Snapshot-and-swap taxonomy store; the commit flag lets tests simulate failures.
#[derive(Default)]
pub(crate) struct FakeTaxonomyRepository {
    state: Arc<Mutex<TaxonomyState>>,
    pub(crate) fail_commit: std::sync::atomic::AtomicBool,
}

impl FakeTaxonomyRepository {
    pub(crate) async fn leave_type_count(&self) -> usize {
        self.state.lock().await.leave_types.len()
    }

    pub(crate) async fn leave_subtype_count(&self) -> usize {
        self.state.lock().await.leave_subtypes.len()
    }

    pub(crate) async fn leave_policy_count(&self) -> usize {
        self.state.lock().await.leave_policies.len()
    }
}

fn sorted<T: Clone>(values: impl Iterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut values: Vec<T> = values.collect();
    values.sort_by_key(|value| key(value));
    values
}

#[async_trait]
impl TaxonomyRepository for FakeTaxonomyRepository {
    async fn begin(&self) -> AppResult<Box<dyn TaxonomyTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(FakeTaxonomyTransaction {
            guard,
            working,
            fail_commit: self
                .fail_commit
                .load(std::sync::atomic::Ordering::SeqCst),
        }))
    }

    async fn list_leave_types(&self) -> AppResult<Vec<LeaveType>> {
        let state = self.state.lock().await;
        Ok(sorted(state.leave_types.values().cloned(), LeaveType::created_at))
    }

    async fn list_leave_subtypes(
        &self,
        leave_type_id: Option<LeaveTypeId>,
    ) -> AppResult<Vec<LeaveSubtype>> {
        let state = self.state.lock().await;
        Ok(sorted(
            state
                .leave_subtypes
                .values()
                .filter(|subtype| leave_type_id.is_none_or(|id| subtype.leave_type_id() == id))
                .cloned(),
            LeaveSubtype::created_at,
        ))
    }

    async fn list_leave_policies(&self, filter: &LeavePolicyFilter) -> AppResult<Vec<LeavePolicy>> {
        let state = self.state.lock().await;
        Ok(sorted(
            state
                .leave_policies
                .values()
                .filter(|policy| filter.matches(policy))
                .cloned(),
            LeavePolicy::created_at,
        ))
    }

    async fn find_leave_type(&self, id: LeaveTypeId) -> AppResult<Option<LeaveType>> {
        Ok(self.state.lock().await.leave_types.get(&id).cloned())
    }

    async fn find_leave_type_by_code(
        &self,
        code: &dressrosa_domain::LeaveCode,
    ) -> AppResult<Option<LeaveType>> {
        Ok(self
            .state
            .lock()
            .await
            .leave_types
            .values()
            .find(|leave_type| leave_type.code() == code)
            .cloned())
    }

    async fn find_leave_subtype(&self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>> {
        Ok(self.state.lock().await.leave_subtypes.get(&id).cloned())
    }

    async fn find_leave_policy(&self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>> {
        Ok(self.state.lock().await.leave_policies.get(&id).cloned())
    }
}

struct FakeTaxonomyTransaction {
    guard: tokio::sync::OwnedMutexGuard<TaxonomyState>,
    working: TaxonomyState,
    fail_commit: bool,
}

#[async_trait]
impl TaxonomyTransaction for FakeTaxonomyTransaction {
    async fn find_id_by_code(
        &mut self,
        scope: CodeScope,
        code: &dressrosa_domain::LeaveCode,
    ) -> AppResult<Option<Uuid>> {
        let state = &self.working;
        Ok(match scope {
            CodeScope::LeaveType => state
                .leave_types
                .values()
                .find(|leave_type| leave_type.code() == code)
                .map(|leave_type| leave_type.id().as_uuid()),
            CodeScope::LeaveSubtype(parent) => state
                .leave_subtypes
                .values()
                .find(|subtype| subtype.leave_type_id() == parent && subtype.code() == code)
                .map(|subtype| subtype.id().as_uuid()),
            CodeScope::LeavePolicy => state
                .leave_policies
                .values()
                .find(|policy| policy.code() == code)
                .map(|policy| policy.id().as_uuid()),
        })
    }

    async fn find_leave_type(&mut self, id: LeaveTypeId) -> AppResult<Option<LeaveType>> {
        Ok(self.working.leave_types.get(&id).cloned())
    }

    async fn find_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<Option<LeaveSubtype>> {
        Ok(self.working.leave_subtypes.get(&id).cloned())
    }

    async fn find_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<Option<LeavePolicy>> {
        Ok(self.working.leave_policies.get(&id).cloned())
    }

    async fn insert_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()> {
        self.working
            .leave_types
            .insert(leave_type.id(), leave_type.clone());
        Ok(())
    }

    async fn update_leave_type(&mut self, leave_type: &LeaveType) -> AppResult<()> {
        self.working
            .leave_types
            .insert(leave_type.id(), leave_type.clone());
        Ok(())
    }

    async fn delete_leave_type(&mut self, id: LeaveTypeId) -> AppResult<bool> {
        if self.working.leave_types.remove(&id).is_none() {
            return Ok(false);
        }

        let removed: Vec<LeaveSubtypeId> = self
            .working
            .leave_subtypes
            .values()
            .filter(|subtype| subtype.leave_type_id() == id)
            .map(LeaveSubtype::id)
            .collect();
        for subtype_id in removed {
            self.delete_leave_subtype(subtype_id).await?;
        }
        Ok(true)
    }

    async fn insert_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()> {
        self.working
            .leave_subtypes
            .insert(subtype.id(), subtype.clone());
        Ok(())
    }

    async fn update_leave_subtype(&mut self, subtype: &LeaveSubtype) -> AppResult<()> {
        self.working
            .leave_subtypes
            .insert(subtype.id(), subtype.clone());
        Ok(())
    }

    async fn delete_leave_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<bool> {
        if self.working.leave_subtypes.remove(&id).is_none() {
            return Ok(false);
        }

        for policy in self.working.leave_policies.values_mut() {
            if policy.leave_subtype_id() == Some(id) {
                *policy = policy.without_subtype();
            }
        }
        Ok(true)
    }

    async fn insert_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()> {
        self.working
            .leave_policies
            .insert(policy.id(), policy.clone());
        Ok(())
    }

    async fn update_leave_policy(&mut self, policy: &LeavePolicy) -> AppResult<()> {
        self.working
            .leave_policies
            .insert(policy.id(), policy.clone());
        Ok(())
    }

    async fn delete_leave_policy(&mut self, id: LeavePolicyId) -> AppResult<bool> {
        Ok(self.working.leave_policies.remove(&id).is_some())
    }

    async fn count_policies_for_subtype(&mut self, id: LeaveSubtypeId) -> AppResult<u64> {
        Ok(self
            .working
            .leave_policies
            .values()
            .filter(|policy| policy.leave_subtype_id() == Some(id))
            .count() as u64)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        if self.fail_commit {
            return Err(AppError::Internal("simulated commit failure".to_owned()));
        }

        let Self {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}
