//! Identity resolution and role-based authorization.
//!
//! Bearer tokens and sessions resolve to the same [`UserIdentity`], and a single
//! decision routine checks that identity against the required roles.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use dressrosa_core::{AppError, AppResult, UserIdentity};
use dressrosa_domain::{RequiredRoles, RoleHierarchy, RoleName, UserId};

use crate::token_crypto::hash_token;
use crate::{AccessTokenRepository, RoleRepository, UserRepository};

const INVALID_CREDENTIAL_MESSAGE: &str = "could not validate credentials";

/// Credential presented by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Opaque bearer token from the `Authorization` header.
    BearerToken(String),
    /// User identifier held by a server-side session.
    Session(UserId),
}

/// Identity that passed a role check, with its effective roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedIdentity {
    /// Resolved identity.
    pub identity: UserIdentity,
    /// Directly assigned roles expanded through the hierarchy.
    pub effective_roles: BTreeSet<RoleName>,
}

/// Application service for authentication and role checks.
#[derive(Clone)]
pub struct AuthorizationService {
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
    access_token_repository: Arc<dyn AccessTokenRepository>,
    hierarchy: Arc<RoleHierarchy>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        access_token_repository: Arc<dyn AccessTokenRepository>,
        hierarchy: RoleHierarchy,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
            access_token_repository,
            hierarchy: Arc::new(hierarchy),
        }
    }

    /// Returns the role hierarchy used for expansion.
    #[must_use]
    pub fn hierarchy(&self) -> &RoleHierarchy {
        self.hierarchy.as_ref()
    }

    /// Resolves a credential into the identity of an active user.
    pub async fn authenticate(&self, credential: &Credential) -> AppResult<UserIdentity> {
        let user_id = match credential {
            Credential::BearerToken(raw_token) => {
                if raw_token.trim().is_empty() {
                    return Err(unauthenticated());
                }

                self.access_token_repository
                    .find_token_owner(hash_token(raw_token).as_str(), Utc::now())
                    .await?
                    .ok_or_else(unauthenticated)?
            }
            Credential::Session(user_id) => *user_id,
        };

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(unauthenticated)?;

        if !user.is_active {
            return Err(AppError::Unauthenticated("inactive user".to_owned()));
        }

        Ok(user.identity())
    }

    /// Checks an identity against the required roles.
    ///
    /// An empty requirement admits any active identity.
    pub async fn authorize(
        &self,
        identity: &UserIdentity,
        required: &RequiredRoles,
    ) -> AppResult<AuthorizedIdentity> {
        if !identity.is_active() {
            return Err(AppError::Unauthenticated("inactive user".to_owned()));
        }

        let user_id = UserId::parse(identity.subject()).map_err(|_| unauthenticated())?;
        let effective_roles = self.effective_roles(user_id).await?;

        if !required.is_satisfied_by(&effective_roles) {
            tracing::warn!(
                subject = identity.subject(),
                username = identity.username(),
                required = ?required.roles(),
                "role check denied"
            );
            return Err(AppError::Forbidden("insufficient role permissions".to_owned()));
        }

        tracing::debug!(
            subject = identity.subject(),
            username = identity.username(),
            "role check allowed"
        );

        Ok(AuthorizedIdentity {
            identity: identity.clone(),
            effective_roles,
        })
    }

    /// Authenticates a credential and checks the resulting identity.
    pub async fn require(
        &self,
        credential: &Credential,
        required: &RequiredRoles,
    ) -> AppResult<AuthorizedIdentity> {
        let identity = self.authenticate(credential).await?;
        self.authorize(&identity, required).await
    }

    /// Returns the user's directly assigned roles expanded through the hierarchy.
    pub async fn effective_roles(&self, user_id: UserId) -> AppResult<BTreeSet<RoleName>> {
        let direct: BTreeSet<RoleName> = self
            .role_repository
            .list_role_names_for_user(user_id)
            .await?
            .into_iter()
            .collect();

        Ok(self.hierarchy.expand(&direct))
    }
}

fn unauthenticated() -> AppError {
    AppError::Unauthenticated(INVALID_CREDENTIAL_MESSAGE.to_owned())
}

#[cfg(test)]
mod tests;
