//! Ports for accounts, roles, access tokens and password hashing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use dressrosa_core::{AppResult, UserIdentity};
use dressrosa_domain::{RoleId, RoleName, UserId};

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique, lowercased email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// Line manager, if mapped.
    pub manager_id: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Projects the record into the identity carried by requests and sessions.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.id.to_string(),
            self.username.clone(),
            Some(self.email.clone()),
            self.is_active,
        )
    }
}

/// Role record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Unique role identifier.
    pub id: RoleId,
    /// Unique normalized role name.
    pub name: RoleName,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Lists users, newest first.
    async fn list_users(&self) -> AppResult<Vec<UserRecord>>;

    /// Persists a new user. Username or email collisions are `AlreadyExists`.
    async fn create_user(&self, user: UserRecord) -> AppResult<()>;

    /// Overwrites a stored user. Returns `false` when the user does not exist.
    async fn update_user(&self, user: UserRecord) -> AppResult<bool>;

    /// Deletes a user with its role assignments and tokens. Reports are detached.
    async fn delete_user(&self, user_id: UserId) -> AppResult<bool>;
}

/// Repository port for roles and role assignments.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>>;

    /// Finds a role by normalized name.
    async fn find_role_by_name(&self, name: &RoleName) -> AppResult<Option<RoleRecord>>;

    /// Creates a role. A name collision is `AlreadyExists`.
    async fn create_role(&self, name: &RoleName) -> AppResult<RoleRecord>;

    /// Deletes a role and its assignments.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool>;

    /// Assigns a role to a user. Assigning an already held role is a no-op.
    async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Removes a role assignment. Returns whether an assignment existed.
    async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool>;

    /// Lists names of roles directly assigned to the user.
    async fn list_role_names_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleName>>;
}

/// Repository port for opaque bearer tokens, stored as SHA-256 hashes.
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Stores a token hash for a user until `expires_at`.
    async fn store_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Returns the owner of an unexpired, unrevoked token.
    async fn find_token_owner(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>>;

    /// Revokes a token. Returns whether an active token was revoked.
    async fn revoke_token(&self, token_hash: &str) -> AppResult<bool>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
