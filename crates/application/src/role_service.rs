//! Role catalog and role assignment administration.

use std::collections::BTreeSet;
use std::sync::Arc;

use dressrosa_core::{AppError, AppResult};
use dressrosa_domain::{RoleHierarchy, RoleName, UserId};

use crate::{RoleRecord, RoleRepository, UserRepository};

/// Direct and hierarchy-expanded roles of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoles {
    /// User the roles belong to.
    pub user_id: UserId,
    /// Roles assigned directly.
    pub direct: BTreeSet<RoleName>,
    /// Direct roles plus everything they imply.
    pub effective: BTreeSet<RoleName>,
}

/// Application service for roles.
#[derive(Clone)]
pub struct RoleService {
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
    hierarchy: Arc<RoleHierarchy>,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        hierarchy: RoleHierarchy,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            hierarchy: Arc::new(hierarchy),
        }
    }

    /// Lists all roles ordered by name.
    pub async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        self.role_repository.list_roles().await
    }

    /// Creates a role. Names are normalized before the uniqueness check.
    pub async fn create_role(&self, name: &str) -> AppResult<RoleRecord> {
        let name = RoleName::new(name)?;
        if self.role_repository.find_role_by_name(&name).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "role '{name}' already exists"
            )));
        }

        let role = self.role_repository.create_role(&name).await?;
        tracing::info!(role = %role.name, "created role");
        Ok(role)
    }

    /// Returns the named role, creating it when missing.
    pub async fn ensure_role(&self, name: &RoleName) -> AppResult<RoleRecord> {
        if let Some(role) = self.role_repository.find_role_by_name(name).await? {
            return Ok(role);
        }

        let role = self.role_repository.create_role(name).await?;
        tracing::info!(role = %role.name, "created missing role");
        Ok(role)
    }

    /// Deletes a role along with its assignments.
    pub async fn delete_role(&self, name: &str) -> AppResult<()> {
        let role = self.require_role(name).await?;
        self.role_repository.delete_role(role.id).await?;

        tracing::info!(role = %role.name, "deleted role");
        Ok(())
    }

    /// Assigns a role to a user. Re-assigning a held role is a no-op.
    pub async fn assign_role(&self, user_id: UserId, role_name: &str) -> AppResult<()> {
        self.require_user(user_id).await?;
        let role = self.require_role(role_name).await?;
        self.role_repository.assign_role(user_id, role.id).await?;

        tracing::info!(user_id = %user_id, role = %role.name, "assigned role");
        Ok(())
    }

    /// Removes a role from a user.
    pub async fn unassign_role(&self, user_id: UserId, role_name: &str) -> AppResult<()> {
        self.require_user(user_id).await?;
        let role = self.require_role(role_name).await?;

        if !self.role_repository.unassign_role(user_id, role.id).await? {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' does not hold role '{}'",
                role.name
            )));
        }

        tracing::info!(user_id = %user_id, role = %role.name, "unassigned role");
        Ok(())
    }

    /// Lists a user's direct and effective roles.
    pub async fn list_user_roles(&self, user_id: UserId) -> AppResult<UserRoles> {
        self.require_user(user_id).await?;
        let direct: BTreeSet<RoleName> = self
            .role_repository
            .list_role_names_for_user(user_id)
            .await?
            .into_iter()
            .collect();
        let effective = self.hierarchy.expand(&direct);

        Ok(UserRoles {
            user_id,
            direct,
            effective,
        })
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<()> {
        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }

    async fn require_role(&self, name: &str) -> AppResult<RoleRecord> {
        let name = RoleName::new(name)?;
        self.role_repository
            .find_role_by_name(&name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dressrosa_core::AppError;
    use dressrosa_domain::{RoleHierarchy, RoleName, UserId};

    use crate::test_support::{FakeRoleRepository, FakeUserRepository, user_record};

    use super::RoleService;

    struct Harness {
        service: RoleService,
        users: Arc<FakeUserRepository>,
        roles: Arc<FakeRoleRepository>,
    }

    fn harness() -> Harness {
        let users = Arc::new(FakeUserRepository::default());
        let roles = Arc::new(FakeRoleRepository::default());
        Harness {
            service: RoleService::new(users.clone(), roles.clone(), RoleHierarchy::standard()),
            users,
            roles,
        }
    }

    fn names(values: &[&str]) -> Vec<RoleName> {
        values
            .iter()
            .map(|value| RoleName::new(value).unwrap_or_else(|_| unreachable!()))
            .collect()
    }

    #[tokio::test]
    async fn create_role_normalizes_and_rejects_duplicates() {
        let harness = harness();

        let created = harness.service.create_role("  Payroll ").await;
        assert!(created.is_ok());
        assert_eq!(
            created.unwrap_or_else(|_| unreachable!()).name.as_str(),
            "payroll"
        );

        let duplicate = harness.service.create_role("PAYROLL").await;
        assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

        let blank = harness.service.create_role("   ").await;
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn ensure_role_is_idempotent() {
        let harness = harness();

        let first = harness
            .service
            .ensure_role(&RoleName::hr())
            .await
            .unwrap_or_else(|_| unreachable!());
        let second = harness
            .service
            .ensure_role(&RoleName::hr())
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(first, second);
        assert_eq!(harness.roles.roles.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn assignment_requires_known_user_and_role() {
        let harness = harness();
        let user = user_record("jdoe", true);
        harness.users.insert(user.clone()).await;
        assert!(harness.service.create_role("manager").await.is_ok());

        let unknown_user = harness.service.assign_role(UserId::new(), "manager").await;
        assert!(matches!(unknown_user, Err(AppError::NotFound(_))));

        let unknown_role = harness.service.assign_role(user.id, "auditor").await;
        assert!(matches!(unknown_role, Err(AppError::NotFound(_))));

        assert!(harness.service.assign_role(user.id, "manager").await.is_ok());
        assert!(harness.service.assign_role(user.id, "Manager").await.is_ok());
        assert_eq!(harness.roles.assignments.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn user_roles_include_implied_roles() {
        let harness = harness();
        let user = user_record("jdoe", true);
        harness.users.insert(user.clone()).await;
        harness.roles.grant(user.id, "hr").await;

        let roles = harness
            .service
            .list_user_roles(user.id)
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(roles.direct.into_iter().collect::<Vec<_>>(), names(&["hr"]));
        assert_eq!(
            roles.effective.into_iter().collect::<Vec<_>>(),
            names(&["employee", "hr", "manager"])
        );
    }

    #[tokio::test]
    async fn unassign_and_delete_remove_assignments() {
        let harness = harness();
        let user = user_record("jdoe", true);
        harness.users.insert(user.clone()).await;
        harness.roles.grant(user.id, "manager").await;
        harness.roles.grant(user.id, "hr").await;

        assert!(harness.service.unassign_role(user.id, "manager").await.is_ok());
        let again = harness.service.unassign_role(user.id, "manager").await;
        assert!(matches!(again, Err(AppError::NotFound(_))));

        assert!(harness.service.delete_role("hr").await.is_ok());
        let roles = harness
            .service
            .list_user_roles(user.id)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(roles.direct.is_empty());
        assert!(roles.effective.is_empty());

        let missing = harness.service.delete_role("hr").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
