use serde_json::json;

use super::*;

fn leave_type(code: &str, name: &str, description: &str) -> CatalogLeaveType {
    CatalogLeaveType {
        code: code.to_owned(),
        name: name.to_owned(),
        description: Some(description.to_owned()),
    }
}

fn leave_subtype(
    leave_type_code: &str,
    code: &str,
    name: &str,
    description: &str,
) -> CatalogLeaveSubtype {
    CatalogLeaveSubtype {
        leave_type_code: leave_type_code.to_owned(),
        code: code.to_owned(),
        name: name.to_owned(),
        description: Some(description.to_owned()),
    }
}

impl TaxonomyCatalog {
    /// Built-in catalog seeded on every installation.
    #[must_use]
    pub fn default_catalog() -> Self {
        Self {
            leave_types: vec![
                leave_type(
                    "paid",
                    "Paid Leave",
                    "Paid leave allocations such as vacation and sick leave.",
                ),
                leave_type(
                    "unpaid",
                    "Unpaid Leave",
                    "Approved leave without salary payment.",
                ),
                leave_type(
                    "holiday_substitution",
                    "Holiday Substitution",
                    "Time-off taken in exchange for work performed on a holiday.",
                ),
            ],
            leave_subtypes: vec![
                leave_subtype(
                    "paid",
                    "vacation",
                    "Vacation",
                    "Planned annual paid vacation days.",
                ),
                leave_subtype(
                    "paid",
                    "sick_leave",
                    "Sick Leave",
                    "Paid leave for medical conditions.",
                ),
                leave_subtype(
                    "paid",
                    "parent_leave",
                    "Parent Leave",
                    "Paid parenthood-related leave.",
                ),
                leave_subtype(
                    "unpaid",
                    "personal_unpaid",
                    "Personal Unpaid",
                    "Unpaid personal time off.",
                ),
                leave_subtype(
                    "unpaid",
                    "medical_unpaid",
                    "Medical Unpaid",
                    "Unpaid medical recovery leave.",
                ),
                leave_subtype(
                    "holiday_substitution",
                    "comp_day",
                    "Compensation Day",
                    "Time off granted in exchange for working on a holiday.",
                ),
            ],
            leave_policies: vec![
                CatalogLeavePolicy {
                    code: "paid-default".to_owned(),
                    name: "Paid Leave Default".to_owned(),
                    leave_type_code: "paid".to_owned(),
                    leave_subtype_code: None,
                    terms: LeavePolicyTerms {
                        entitlement_days: Some(20.0),
                        accrual_rate_per_month: Some(1.67),
                        max_carryover_days: Some(5.0),
                        ..LeavePolicyTerms::default()
                    },
                },
                CatalogLeavePolicy {
                    code: "paid-sick-leave".to_owned(),
                    name: "Paid Sick Leave".to_owned(),
                    leave_type_code: "paid".to_owned(),
                    leave_subtype_code: Some("sick_leave".to_owned()),
                    terms: LeavePolicyTerms {
                        entitlement_days: Some(10.0),
                        max_carryover_days: Some(0.0),
                        rules: Some(json!({ "medical_certificate_after_days": 3 })),
                        ..LeavePolicyTerms::default()
                    },
                },
                CatalogLeavePolicy {
                    code: "unpaid-default".to_owned(),
                    name: "Unpaid Leave Default".to_owned(),
                    leave_type_code: "unpaid".to_owned(),
                    leave_subtype_code: None,
                    terms: LeavePolicyTerms {
                        entitlement_days: Some(30.0),
                        max_carryover_days: Some(0.0),
                        rules: Some(json!({ "requires_approval": true })),
                        ..LeavePolicyTerms::default()
                    },
                },
                CatalogLeavePolicy {
                    code: "holiday-substitution-default".to_owned(),
                    name: "Holiday Substitution Default".to_owned(),
                    leave_type_code: "holiday_substitution".to_owned(),
                    leave_subtype_code: Some("comp_day".to_owned()),
                    terms: LeavePolicyTerms {
                        max_carryover_days: Some(0.0),
                        rules: Some(json!({ "expires_after_days": 90 })),
                        ..LeavePolicyTerms::default()
                    },
                },
            ],
        }
    }
}
