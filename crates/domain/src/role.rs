use std::collections::{BTreeMap, BTreeSet};

use dressrosa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Role names seeded for every installation, lowest privilege first.
pub const WELL_KNOWN_ROLES: [&str; 4] = ["employee", "manager", "hr", "admin"];

const ROLE_NAME_MAX_CHARS: usize = 50;

/// Normalized role name.
///
/// Role names are open-ended: the well-known roles have constructors, but any
/// trimmed, lowercased, non-empty name is a valid role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Creates a role name, trimming and lowercasing the input.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let normalized = value.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::Validation(
                "role name must not be empty".to_owned(),
            ));
        }

        if normalized.chars().count() > ROLE_NAME_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "role name must not exceed {ROLE_NAME_MAX_CHARS} characters"
            )));
        }

        Ok(Self(normalized))
    }

    /// The `employee` role.
    #[must_use]
    pub fn employee() -> Self {
        Self("employee".to_owned())
    }

    /// The `manager` role.
    #[must_use]
    pub fn manager() -> Self {
        Self("manager".to_owned())
    }

    /// The `hr` role.
    #[must_use]
    pub fn hr() -> Self {
        Self("hr".to_owned())
    }

    /// The `admin` role.
    #[must_use]
    pub fn admin() -> Self {
        Self("admin".to_owned())
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Role inheritance table: each role maps to the roles it directly implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHierarchy {
    implied: BTreeMap<RoleName, BTreeSet<RoleName>>,
}

impl RoleHierarchy {
    /// Returns the standard hierarchy `admin > hr > manager > employee`.
    #[must_use]
    pub fn standard() -> Self {
        let implied = BTreeMap::from([
            (
                RoleName::admin(),
                BTreeSet::from([RoleName::hr(), RoleName::manager(), RoleName::employee()]),
            ),
            (
                RoleName::hr(),
                BTreeSet::from([RoleName::manager(), RoleName::employee()]),
            ),
            (RoleName::manager(), BTreeSet::from([RoleName::employee()])),
            (RoleName::employee(), BTreeSet::new()),
        ]);

        Self { implied }
    }

    /// Builds a hierarchy from `(role, implied roles)` edges.
    ///
    /// Repeated roles merge their implied sets. Cycles are accepted.
    pub fn with_edges<R, I, S>(edges: impl IntoIterator<Item = (R, I)>) -> AppResult<Self>
    where
        R: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut implied: BTreeMap<RoleName, BTreeSet<RoleName>> = BTreeMap::new();
        for (role, children) in edges {
            let role = RoleName::new(role)?;
            let children = children
                .into_iter()
                .map(RoleName::new)
                .collect::<AppResult<BTreeSet<_>>>()?;
            implied.entry(role).or_default().extend(children);
        }

        Ok(Self { implied })
    }

    /// Returns the roles directly implied by `role`.
    pub fn implied_roles(&self, role: &RoleName) -> impl Iterator<Item = &RoleName> {
        self.implied.get(role).into_iter().flatten()
    }

    /// Expands directly assigned roles into the effective role set.
    ///
    /// The result is the least set containing `direct` that is closed under the
    /// inheritance relation. Roles missing from the table imply nothing.
    #[must_use]
    pub fn expand(&self, direct: &BTreeSet<RoleName>) -> BTreeSet<RoleName> {
        let mut effective = direct.clone();
        let mut pending: Vec<&RoleName> = direct.iter().collect();

        while let Some(role) = pending.pop() {
            for inherited in self.implied_roles(role) {
                if effective.insert(inherited.clone()) {
                    pending.push(inherited);
                }
            }
        }

        effective
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Roles accepted by a guarded operation; holding any one of them is enough.
///
/// An empty set admits every authenticated, active identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles(BTreeSet<RoleName>);

impl RequiredRoles {
    /// Requires authentication only.
    #[must_use]
    pub fn authenticated() -> Self {
        Self(BTreeSet::new())
    }

    /// Requires at least one of the given roles.
    #[must_use]
    pub fn any_of(roles: impl IntoIterator<Item = RoleName>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// HR staff or administrators.
    #[must_use]
    pub fn hr_or_admin() -> Self {
        Self::any_of([RoleName::hr(), RoleName::admin()])
    }

    /// Returns whether no specific role is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the accepted roles.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.0
    }

    /// Returns whether an effective role set satisfies the requirement.
    #[must_use]
    pub fn is_satisfied_by(&self, effective: &BTreeSet<RoleName>) -> bool {
        self.0.is_empty() || !self.0.is_disjoint(effective)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::{RequiredRoles, RoleHierarchy, RoleName};

    fn roles(names: &[&str]) -> BTreeSet<RoleName> {
        names
            .iter()
            .map(|name| RoleName::new(name).unwrap_or_else(|_| unreachable!()))
            .collect()
    }

    #[test]
    fn admin_expands_to_every_standard_role() {
        let hierarchy = RoleHierarchy::standard();
        assert_eq!(
            hierarchy.expand(&roles(&["admin"])),
            roles(&["admin", "hr", "manager", "employee"])
        );
    }

    #[test]
    fn lower_roles_expand_to_their_descendants() {
        let hierarchy = RoleHierarchy::standard();
        assert_eq!(
            hierarchy.expand(&roles(&["hr"])),
            roles(&["hr", "manager", "employee"])
        );
        assert_eq!(
            hierarchy.expand(&roles(&["manager"])),
            roles(&["manager", "employee"])
        );
        assert_eq!(hierarchy.expand(&roles(&["employee"])), roles(&["employee"]));
    }

    #[test]
    fn overlapping_direct_roles_are_not_duplicated() {
        let hierarchy = RoleHierarchy::standard();
        assert_eq!(
            hierarchy.expand(&roles(&["employee", "manager"])),
            roles(&["employee", "manager"])
        );
    }

    #[test]
    fn unknown_roles_are_kept_without_implications() {
        let hierarchy = RoleHierarchy::standard();
        assert_eq!(
            hierarchy.expand(&roles(&["auditor"])),
            roles(&["auditor"])
        );
    }

    #[test]
    fn cyclic_table_terminates() {
        let hierarchy = RoleHierarchy::with_edges([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
        ]);
        assert!(hierarchy.is_ok());
        let hierarchy = hierarchy.unwrap_or_else(|_| unreachable!());

        assert_eq!(hierarchy.expand(&roles(&["b"])), roles(&["a", "b", "c"]));
    }

    #[test]
    fn custom_roles_extend_the_table() {
        let hierarchy = RoleHierarchy::with_edges([
            ("admin", vec!["hr", "manager", "employee"]),
            ("payroll", vec!["employee"]),
        ]);
        assert!(hierarchy.is_ok());
        assert_eq!(
            hierarchy
                .unwrap_or_else(|_| unreachable!())
                .expand(&roles(&["Payroll "])),
            roles(&["payroll", "employee"])
        );
    }

    #[test]
    fn role_names_are_normalized() {
        let name = RoleName::new("  HR ");
        assert!(name.is_ok());
        assert_eq!(name.unwrap_or_else(|_| unreachable!()), RoleName::hr());
        assert!(RoleName::new("   ").is_err());
    }

    #[test]
    fn empty_requirement_is_always_satisfied() {
        assert!(RequiredRoles::authenticated().is_satisfied_by(&BTreeSet::new()));
    }

    #[test]
    fn requirement_needs_one_overlapping_role() {
        let required = RequiredRoles::hr_or_admin();
        assert!(required.is_satisfied_by(&roles(&["hr", "manager", "employee"])));
        assert!(!required.is_satisfied_by(&roles(&["manager", "employee"])));
    }

    fn role_subset() -> impl Strategy<Value = BTreeSet<RoleName>> {
        proptest::sample::subsequence(
            vec!["employee", "manager", "hr", "admin", "payroll", "auditor"],
            0..=6,
        )
        .prop_map(|names| roles(&names))
    }

    proptest! {
        #[test]
        fn expansion_contains_its_input(direct in role_subset()) {
            let hierarchy = RoleHierarchy::standard();
            prop_assert!(hierarchy.expand(&direct).is_superset(&direct));
        }

        #[test]
        fn expansion_is_idempotent(direct in role_subset()) {
            let hierarchy = RoleHierarchy::standard();
            let once = hierarchy.expand(&direct);
            prop_assert_eq!(hierarchy.expand(&once), once);
        }

        #[test]
        fn expansion_is_monotonic(left in role_subset(), right in role_subset()) {
            let hierarchy = RoleHierarchy::standard();
            let union: BTreeSet<RoleName> = left.union(&right).cloned().collect();
            prop_assert!(hierarchy.expand(&union).is_superset(&hierarchy.expand(&left)));
        }
    }
}
