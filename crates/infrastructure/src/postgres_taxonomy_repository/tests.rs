use std::sync::Arc;

use chrono::NaiveDate;
use dressrosa_application::{
    LeavePolicyFilter, LeavePolicyInput, LeaveSubtypeInput, LeaveTypeInput, TaxonomyRepository,
    TaxonomyService,
};
use dressrosa_core::AppError;
use dressrosa_domain::{LeavePolicyTerms, LeaveTypeId};

use super::PostgresTaxonomyRepository;
use crate::postgres_test_support::{test_pool, unique_suffix};

fn unique_code(prefix: &str) -> String {
    format!("{prefix}_{}", unique_suffix())
}

async fn create_type(service: &TaxonomyService, code: &str) -> LeaveTypeId {
    service
        .create_leave_type(LeaveTypeInput {
            code: code.to_owned(),
            name: format!("{code} leave"),
            description: Some("  ".to_owned()),
            is_active: true,
        })
        .await
        .unwrap_or_else(|error| panic!("failed to create leave type: {error}"))
        .id()
}

fn subtype_input(leave_type_id: LeaveTypeId, code: &str) -> LeaveSubtypeInput {
    LeaveSubtypeInput {
        leave_type_id,
        code: code.to_owned(),
        name: format!("{code} subtype"),
        description: None,
        is_active: true,
    }
}

#[tokio::test]
async fn leave_type_round_trips_normalized_fields() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let service = TaxonomyService::new(Arc::new(PostgresTaxonomyRepository::new(pool)));
    let code = unique_code("paid");
    let id = create_type(&service, &format!("  {}  ", code.to_uppercase())).await;

    let stored = service.get_leave_type(id).await;
    assert!(stored.is_ok());
    let stored = stored.unwrap_or_else(|_| unreachable!());
    assert_eq!(stored.code().as_str(), code);
    assert_eq!(stored.description(), None);

    let by_code = service.find_leave_type_by_code(&code).await;
    assert!(matches!(by_code, Ok(Some(found)) if found.id() == id));
}

#[tokio::test]
async fn subtype_codes_are_scoped_to_their_type() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let service = TaxonomyService::new(Arc::new(PostgresTaxonomyRepository::new(pool)));
    let paid = create_type(&service, &unique_code("paid")).await;
    let unpaid = create_type(&service, &unique_code("unpaid")).await;

    assert!(
        service
            .create_leave_subtype(subtype_input(paid, "other"))
            .await
            .is_ok()
    );
    assert!(
        service
            .create_leave_subtype(subtype_input(unpaid, "other"))
            .await
            .is_ok()
    );
    let duplicate = service
        .create_leave_subtype(subtype_input(paid, "OTHER"))
        .await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn policy_terms_survive_storage_and_type_deletion_detaches_subtype() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = Arc::new(PostgresTaxonomyRepository::new(pool));
    let service = TaxonomyService::new(repository.clone());
    let paid = create_type(&service, &unique_code("paid")).await;
    let sick = service
        .create_leave_subtype(subtype_input(paid, "sick_leave"))
        .await
        .unwrap_or_else(|error| panic!("failed to create subtype: {error}"))
        .id();

    let terms = LeavePolicyTerms {
        entitlement_days: Some(20.0),
        accrual_rate_per_month: Some(1.67),
        max_carryover_days: Some(5.0),
        effective_from: NaiveDate::from_ymd_opt(2026, 1, 1),
        effective_to: NaiveDate::from_ymd_opt(2026, 12, 31),
        rules: Some(serde_json::json!({"requires_certificate_after_days": 3})),
    };
    let policy = service
        .create_leave_policy(LeavePolicyInput {
            code: unique_code("paid-sick"),
            name: "Paid sick leave".to_owned(),
            leave_type_id: paid,
            leave_subtype_id: Some(sick),
            terms: terms.clone(),
            is_active: true,
        })
        .await
        .unwrap_or_else(|error| panic!("failed to create policy: {error}"));
    assert_eq!(policy.terms(), &terms);

    let listed = service
        .list_leave_policies(LeavePolicyFilter {
            leave_type_id: Some(paid),
            leave_subtype_id: Some(sick),
        })
        .await
        .unwrap_or_else(|error| panic!("failed to list policies: {error}"));
    assert_eq!(listed, vec![policy.clone()]);

    assert!(service.delete_leave_type(paid).await.is_ok());
    assert!(
        repository
            .list_leave_subtypes(Some(paid))
            .await
            .unwrap_or_else(|_| unreachable!())
            .is_empty()
    );
    let detached = service
        .get_leave_policy(policy.id())
        .await
        .unwrap_or_else(|error| panic!("policy should survive type deletion: {error}"));
    assert_eq!(detached.leave_subtype_id(), None);
    assert_eq!(detached.leave_type_id(), paid);
}

#[tokio::test]
async fn uncommitted_transaction_is_rolled_back() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresTaxonomyRepository::new(pool);
    let leave_type = dressrosa_domain::LeaveType::new(
        LeaveTypeId::new(),
        unique_code("draft"),
        "Draft",
        None,
        true,
        chrono::Utc::now(),
    )
    .unwrap_or_else(|_| unreachable!());

    {
        let mut transaction = repository
            .begin()
            .await
            .unwrap_or_else(|error| panic!("failed to begin: {error}"));
        assert!(transaction.insert_leave_type(&leave_type).await.is_ok());
    }

    let found = repository.find_leave_type(leave_type.id()).await;
    assert!(matches!(found, Ok(None)));
}
