use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use dressrosa_core::{AppError, UserIdentity};
use dressrosa_domain::{RequiredRoles, RoleHierarchy, RoleName, UserId};

use crate::test_support::{
    FakeAccessTokenRepository, FakeRoleRepository, FakeUserRepository, user_record,
};
use crate::token_crypto::generate_token;
use crate::{AccessTokenRepository, UserRecord};

use super::{AuthorizationService, Credential};

struct Harness {
    service: AuthorizationService,
    users: Arc<FakeUserRepository>,
    roles: Arc<FakeRoleRepository>,
    tokens: Arc<FakeAccessTokenRepository>,
}

fn harness() -> Harness {
    let users = Arc::new(FakeUserRepository::default());
    let roles = Arc::new(FakeRoleRepository::default());
    let tokens = Arc::new(FakeAccessTokenRepository::default());
    let service = AuthorizationService::new(
        users.clone(),
        roles.clone(),
        tokens.clone(),
        RoleHierarchy::standard(),
    );

    Harness {
        service,
        users,
        roles,
        tokens,
    }
}

async fn add_user(harness: &Harness, username: &str, is_active: bool, roles: &[&str]) -> UserRecord {
    let user = user_record(username, is_active);
    harness.users.insert(user.clone()).await;
    for role in roles {
        harness.roles.grant(user.id, role).await;
    }
    user
}

async fn bearer_for(harness: &Harness, user_id: UserId, ttl: Duration) -> Credential {
    let (raw, hash) = generate_token().unwrap_or_else(|_| unreachable!());
    let stored = harness
        .tokens
        .store_token(user_id, hash.as_str(), Utc::now() + ttl)
        .await;
    assert!(stored.is_ok());
    Credential::BearerToken(raw)
}

fn roles(names: &[&str]) -> BTreeSet<RoleName> {
    names
        .iter()
        .map(|name| RoleName::new(name).unwrap_or_else(|_| unreachable!()))
        .collect()
}

#[tokio::test]
async fn bearer_token_resolves_to_active_user() {
    let harness = harness();
    let user = add_user(&harness, "jdoe", true, &["employee"]).await;
    let credential = bearer_for(&harness, user.id, Duration::minutes(120)).await;

    let identity = harness.service.authenticate(&credential).await;
    assert!(identity.is_ok());
    let identity = identity.unwrap_or_else(|_| unreachable!());
    assert_eq!(identity.subject(), user.id.to_string());
    assert_eq!(identity.username(), "jdoe");
}

#[tokio::test]
async fn unknown_or_expired_tokens_are_unauthenticated() {
    let harness = harness();
    let user = add_user(&harness, "jdoe", true, &[]).await;

    let unknown = harness
        .service
        .authenticate(&Credential::BearerToken("not-a-token".to_owned()))
        .await;
    assert!(matches!(unknown, Err(AppError::Unauthenticated(_))));

    let blank = harness
        .service
        .authenticate(&Credential::BearerToken("  ".to_owned()))
        .await;
    assert!(matches!(blank, Err(AppError::Unauthenticated(_))));

    let expired = bearer_for(&harness, user.id, Duration::minutes(-1)).await;
    let expired = harness.service.authenticate(&expired).await;
    assert!(matches!(expired, Err(AppError::Unauthenticated(_))));
}

#[tokio::test]
async fn session_for_deleted_or_inactive_user_is_unauthenticated() {
    let harness = harness();
    let inactive = add_user(&harness, "gone", false, &["admin"]).await;

    let missing = harness
        .service
        .authenticate(&Credential::Session(UserId::new()))
        .await;
    assert!(matches!(missing, Err(AppError::Unauthenticated(_))));

    let inactive = harness
        .service
        .authenticate(&Credential::Session(inactive.id))
        .await;
    assert!(matches!(inactive, Err(AppError::Unauthenticated(_))));
}

#[tokio::test]
async fn empty_requirement_admits_any_active_identity() {
    let harness = harness();
    let user = add_user(&harness, "norole", true, &[]).await;

    let authorized = harness
        .service
        .authorize(&user.identity(), &RequiredRoles::authenticated())
        .await;
    assert!(authorized.is_ok());
    assert!(
        authorized
            .unwrap_or_else(|_| unreachable!())
            .effective_roles
            .is_empty()
    );
}

#[tokio::test]
async fn inactive_identity_is_unauthenticated_even_without_requirements() {
    let harness = harness();
    let identity = UserIdentity::new(UserId::new().to_string(), "ghost", None, false);

    let result = harness
        .service
        .authorize(&identity, &RequiredRoles::authenticated())
        .await;
    assert!(matches!(result, Err(AppError::Unauthenticated(_))));
}

#[tokio::test]
async fn inherited_roles_satisfy_lower_requirements() {
    let harness = harness();
    let admin = add_user(&harness, "admin", true, &["admin"]).await;

    let result = harness
        .service
        .authorize(&admin.identity(), &RequiredRoles::any_of([RoleName::employee()]))
        .await;
    assert!(result.is_ok());
    assert_eq!(
        result.unwrap_or_else(|_| unreachable!()).effective_roles,
        roles(&["admin", "hr", "manager", "employee"])
    );
}

#[tokio::test]
async fn missing_role_is_forbidden() {
    let harness = harness();
    let manager = add_user(&harness, "manager", true, &["manager"]).await;

    let result = harness
        .service
        .authorize(&manager.identity(), &RequiredRoles::hr_or_admin())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn token_and_session_share_the_same_decision() {
    let harness = harness();
    let hr = add_user(&harness, "hr_user", true, &["hr"]).await;
    let bearer = bearer_for(&harness, hr.id, Duration::minutes(5)).await;
    let session = Credential::Session(hr.id);

    for required in [
        RequiredRoles::any_of([RoleName::manager()]),
        RequiredRoles::any_of([RoleName::admin()]),
    ] {
        let via_token = harness.service.require(&bearer, &required).await;
        let via_session = harness.service.require(&session, &required).await;
        assert_eq!(via_token.is_ok(), via_session.is_ok());
    }

    let admin_only = harness
        .service
        .require(&session, &RequiredRoles::any_of([RoleName::admin()]))
        .await;
    assert!(matches!(admin_only, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn custom_hierarchy_grants_new_roles() {
    let users = Arc::new(FakeUserRepository::default());
    let role_repository = Arc::new(FakeRoleRepository::default());
    let hierarchy = RoleHierarchy::with_edges([
        ("admin", vec!["hr", "manager", "employee"]),
        ("hr", vec!["manager", "employee"]),
        ("manager", vec!["employee"]),
        ("payroll", vec!["employee"]),
    ])
    .unwrap_or_else(|_| unreachable!());
    let service = AuthorizationService::new(
        users.clone(),
        role_repository.clone(),
        Arc::new(FakeAccessTokenRepository::default()),
        hierarchy,
    );

    let clerk = user_record("clerk", true);
    users.insert(clerk.clone()).await;
    role_repository.grant(clerk.id, "payroll").await;

    let result = service
        .require(
            &Credential::Session(clerk.id),
            &RequiredRoles::any_of([RoleName::employee()]),
        )
        .await;
    assert!(result.is_ok());
}
