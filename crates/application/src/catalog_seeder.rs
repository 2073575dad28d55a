//! Idempotent reconciliation of the default leave catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dressrosa_domain::LeavePolicyTerms;

use crate::TaxonomyRepository;

/// Catalog leave type, keyed by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLeaveType {
    /// Code, normalized before lookup.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Catalog leave subtype, keyed by parent type code and code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLeaveSubtype {
    /// Code of the parent leave type.
    pub leave_type_code: String,
    /// Code, normalized before lookup.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Catalog leave policy, keyed by code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLeavePolicy {
    /// Code, normalized before lookup.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Code of the leave type the policy applies to.
    pub leave_type_code: String,
    /// Code of the subtype under `leave_type_code`, if any.
    #[serde(default)]
    pub leave_subtype_code: Option<String>,
    /// Entitlement and validity terms.
    #[serde(flatten)]
    pub terms: LeavePolicyTerms,
}

/// Declarative leave catalog applied by [`CatalogSeeder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyCatalog {
    /// Leave types, applied first.
    #[serde(default)]
    pub leave_types: Vec<CatalogLeaveType>,
    /// Leave subtypes, applied after types.
    #[serde(default)]
    pub leave_subtypes: Vec<CatalogLeaveSubtype>,
    /// Leave policies, applied last.
    #[serde(default)]
    pub leave_policies: Vec<CatalogLeavePolicy>,
}

/// Per-level counts of one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    /// Entries inserted.
    pub created: usize,
    /// Existing entries whose fields changed.
    pub updated: usize,
    /// Existing entries already matching the catalog.
    pub unchanged: usize,
    /// Entries with an unresolved parent or invalid fields.
    pub skipped: usize,
}

/// Outcome of [`CatalogSeeder::reconcile_defaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Leave type counts.
    pub leave_types: SeedCounts,
    /// Leave subtype counts.
    pub leave_subtypes: SeedCounts,
    /// Leave policy counts.
    pub leave_policies: SeedCounts,
}

impl SeedReport {
    /// Total entries created across all levels.
    #[must_use]
    pub fn total_created(&self) -> usize {
        self.leave_types.created + self.leave_subtypes.created + self.leave_policies.created
    }

    /// Total entries skipped across all levels.
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.leave_types.skipped + self.leave_subtypes.skipped + self.leave_policies.skipped
    }
}

/// Upserts catalog entries into the taxonomy store.
#[derive(Clone)]
pub struct CatalogSeeder {
    repository: Arc<dyn TaxonomyRepository>,
}

impl CatalogSeeder {
    /// Creates a new catalog seeder.
    #[must_use]
    pub fn new(repository: Arc<dyn TaxonomyRepository>) -> Self {
        Self { repository }
    }
}

mod catalog;
mod reconcile;
