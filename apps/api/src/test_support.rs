//! In-process security store and state builder for handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dressrosa_application::{
    AccessTokenRepository, AuthorizationService, PasswordHasher, RoleRecord, RoleRepository,
    RoleService, TaxonomyService, UserRecord, UserRepository, UserService,
};
use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{RoleHierarchy, RoleId, RoleName, UserId};
use dressrosa_infrastructure::InMemoryTaxonomyRepository;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Mutex;

use crate::state::AppState;

#[derive(Default)]
pub(crate) struct FakeSecurityStore {
    users: Mutex<Vec<UserRecord>>,
    roles: Mutex<Vec<RoleRecord>>,
    assignments: Mutex<Vec<(UserId, RoleId)>>,
    tokens: Mutex<Vec<(String, UserId, DateTime<Utc>)>>,
}

impl FakeSecurityStore {
    /// Inserts an active user holding the given roles.
    pub(crate) async fn user_with_roles(&self, username: &str, roles: &[&str]) -> UserId {
        let user_id = UserId::new();
        self.users.lock().await.push(UserRecord {
            id: user_id,
            username: username.to_owned(),
            email: format!("{username}@dressrosa.local"),
            full_name: username.to_owned(),
            password_hash: "plain:Secret123".to_owned(),
            is_active: true,
            manager_id: None,
            created_at: Utc::now(),
        });

        for role in roles {
            let name = RoleName::new(role).unwrap_or_else(|_| unreachable!());
            let existing = self.find_role_by_name(&name).await.unwrap_or_default();
            let role = match existing {
                Some(role) => role,
                None => self
                    .create_role(&name)
                    .await
                    .unwrap_or_else(|_| unreachable!()),
            };
            self.assignments.lock().await.push((user_id, role.id));
        }

        user_id
    }
}

#[async_trait]
impl UserRepository for FakeSecurityStore {
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
        Ok(self.users.lock().await.clone())
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
        Ok(users.len() != before)
    }
}

#[async_trait]
impl RoleRepository for FakeSecurityStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        Ok(self.roles.lock().await.clone())
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
        let role = RoleRecord {
            id: RoleId::new(),
            name: name.clone(),
        };
        self.roles.lock().await.push(role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        self.assignments
            .lock()
            .await
            .retain(|(_, assigned)| *assigned != role_id);
        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.id != role_id);
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
        let assigned: Vec<RoleId> = self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|(holder, _)| *holder == user_id)
            .map(|(_, role_id)| *role_id)
            .collect();

        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| assigned.contains(&role.id))
            .map(|role| role.name.clone())
            .collect())
    }
}

#[async_trait]
impl AccessTokenRepository for FakeSecurityStore {
    async fn store_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.tokens
            .lock()
            .await
            .push((token_hash.to_owned(), user_id, expires_at));
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
            .iter()
            .find(|(hash, _, expires_at)| hash == token_hash && *expires_at > now)
            .map(|(_, user_id, _)| *user_id))
    }

    async fn revoke_token(&self, token_hash: &str) -> AppResult<bool> {
        let mut tokens = self.tokens.lock().await;
        let before = tokens.len();
        tokens.retain(|(hash, _, _)| hash != token_hash);
        Ok(tokens.len() != before)
    }
}

pub(crate) struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Builds state over the fake store and an in-memory taxonomy.
///
/// The Postgres pool is lazy and never connected.
pub(crate) fn test_state(store: Arc<FakeSecurityStore>) -> AppState {
    let hierarchy = RoleHierarchy::standard();
    let postgres_pool = PgPoolOptions::new()
        .connect_lazy("postgres://dressrosa@localhost/dressrosa")
        .unwrap_or_else(|_| unreachable!());

    AppState {
        authorization_service: AuthorizationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            hierarchy.clone(),
        ),
        user_service: UserService::new(
            store.clone(),
            Arc::new(PlainPasswordHasher),
            store.clone(),
            Duration::minutes(120),
        ),
        role_service: RoleService::new(store.clone(), store, hierarchy),
        taxonomy_service: TaxonomyService::new(Arc::new(InMemoryTaxonomyRepository::new())),
        postgres_pool,
    }
}
