//! `seed` command: well-known roles, the bootstrap admin and the default catalog.

use dressrosa_application::{CatalogSeeder, CreateUserInput, SeedCounts, TaxonomyCatalog};
use dressrosa_core::AppError;
use dressrosa_domain::{RoleName, WELL_KNOWN_ROLES};

use crate::api_config::BootstrapAdminConfig;
use crate::state::AppState;

/// Runs every seeding step. Safe to repeat.
pub async fn run(
    state: &AppState,
    catalog_seeder: &CatalogSeeder,
    admin: &BootstrapAdminConfig,
) -> Result<(), AppError> {
    for name in WELL_KNOWN_ROLES {
        state.role_service.ensure_role(&RoleName::new(name)?).await?;
    }

    ensure_bootstrap_admin(state, admin).await?;

    let report = catalog_seeder
        .reconcile_defaults(&TaxonomyCatalog::default_catalog())
        .await?;
    log_counts("leave types", &report.leave_types);
    log_counts("leave subtypes", &report.leave_subtypes);
    log_counts("leave policies", &report.leave_policies);

    Ok(())
}

async fn ensure_bootstrap_admin(
    state: &AppState,
    admin: &BootstrapAdminConfig,
) -> Result<(), AppError> {
    let user = match state.user_service.find_by_username(&admin.username).await? {
        Some(user) => {
            tracing::info!(username = %user.username, "bootstrap admin already exists");
            user
        }
        None => {
            let password = admin.password.clone().ok_or_else(|| {
                AppError::Validation(
                    "BOOTSTRAP_ADMIN_PASSWORD is required to create the bootstrap admin"
                        .to_owned(),
                )
            })?;

            let user = state
                .user_service
                .create_user(CreateUserInput {
                    username: admin.username.clone(),
                    email: admin.email.clone(),
                    full_name: admin.full_name.clone(),
                    password,
                    is_active: true,
                })
                .await?;
            tracing::info!(username = %user.username, "created bootstrap admin");
            user
        }
    };

    state
        .role_service
        .assign_role(user.id, RoleName::admin().as_str())
        .await
}

fn log_counts(kind: &str, counts: &SeedCounts) {
    tracing::info!(
        kind,
        created = counts.created,
        updated = counts.updated,
        unchanged = counts.unchanged,
        skipped = counts.skipped,
        "seeded default catalog"
    );
}
