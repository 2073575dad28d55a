use chrono::{DateTime, Utc};
use dressrosa_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{LeaveSubtypeId, LeaveTypeId};

/// Maximum length of a leave type or subtype code.
pub const CODE_MAX_CHARS: usize = 50;

/// Maximum length of a leave policy code.
pub const POLICY_CODE_MAX_CHARS: usize = 80;

/// Maximum length of a display name.
pub const NAME_MAX_CHARS: usize = 120;

/// Maximum length of a free-text description.
pub const DESCRIPTION_MAX_CHARS: usize = 255;

/// Normalized taxonomy code: trimmed, lowercased and non-empty.
///
/// Codes are compared and stored in this form only, so `" Paid "` and `"paid"`
/// are the same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LeaveCode(String);

impl LeaveCode {
    /// Creates a type or subtype code.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        Self::bounded(value.as_ref(), CODE_MAX_CHARS)
    }

    /// Creates a policy code, which allows a longer value.
    pub fn for_policy(value: impl AsRef<str>) -> AppResult<Self> {
        Self::bounded(value.as_ref(), POLICY_CODE_MAX_CHARS)
    }

    fn bounded(value: &str, max_chars: usize) -> AppResult<Self> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::Validation("code must not be empty".to_owned()));
        }

        if normalized.chars().count() > max_chars {
            return Err(AppError::Validation(format!(
                "code '{normalized}' must not exceed {max_chars} characters"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Deserialized codes accept the policy bound; entities re-check their own limit.
impl TryFrom<String> for LeaveCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::for_policy(value)
    }
}

impl From<LeaveCode> for String {
    fn from(value: LeaveCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for LeaveCode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Trims optional free text, mapping blank values to `None`.
pub fn normalize_optional_text(
    value: Option<String>,
    field: &str,
    max_chars: usize,
) -> AppResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{field} must not exceed {max_chars} characters"
        )));
    }

    Ok(Some(trimmed.to_owned()))
}

pub(crate) fn bounded_name(value: impl Into<String>) -> AppResult<NonEmptyString> {
    let name = NonEmptyString::new(value)
        .map_err(|_| AppError::Validation("name must not be empty".to_owned()))?;
    if name.as_str().chars().count() > NAME_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "name must not exceed {NAME_MAX_CHARS} characters"
        )));
    }

    Ok(name)
}

/// Top-level leave category such as paid or unpaid leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LeaveTypeFields")]
pub struct LeaveType {
    id: LeaveTypeId,
    code: LeaveCode,
    name: NonEmptyString,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl LeaveType {
    /// Creates a validated leave type.
    pub fn new(
        id: LeaveTypeId,
        code: impl AsRef<str>,
        name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            code: LeaveCode::new(code)?,
            name: bounded_name(name)?,
            description: normalize_optional_text(
                description,
                "description",
                DESCRIPTION_MAX_CHARS,
            )?,
            is_active,
            created_at,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> LeaveTypeId {
        self.id
    }

    /// Returns the globally unique code.
    #[must_use]
    pub fn code(&self) -> &LeaveCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the type can be used for new requests.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the type was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Deserialize)]
struct LeaveTypeFields {
    id: LeaveTypeId,
    code: String,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveTypeFields> for LeaveType {
    type Error = AppError;

    fn try_from(fields: LeaveTypeFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.id,
            fields.code,
            fields.name,
            fields.description,
            fields.is_active,
            fields.created_at,
        )
    }
}

/// Leave category nested under a [`LeaveType`], such as sick leave under paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LeaveSubtypeFields")]
pub struct LeaveSubtype {
    id: LeaveSubtypeId,
    leave_type_id: LeaveTypeId,
    code: LeaveCode,
    name: NonEmptyString,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl LeaveSubtype {
    /// Creates a validated leave subtype.
    pub fn new(
        id: LeaveSubtypeId,
        leave_type_id: LeaveTypeId,
        code: impl AsRef<str>,
        name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            leave_type_id,
            code: LeaveCode::new(code)?,
            name: bounded_name(name)?,
            description: normalize_optional_text(
                description,
                "description",
                DESCRIPTION_MAX_CHARS,
            )?,
            is_active,
            created_at,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> LeaveSubtypeId {
        self.id
    }

    /// Returns the parent leave type.
    #[must_use]
    pub fn leave_type_id(&self) -> LeaveTypeId {
        self.leave_type_id
    }

    /// Returns the code, unique among siblings of the same type.
    #[must_use]
    pub fn code(&self) -> &LeaveCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the subtype can be used for new requests.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the subtype was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Deserialize)]
struct LeaveSubtypeFields {
    id: LeaveSubtypeId,
    leave_type_id: LeaveTypeId,
    code: String,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<LeaveSubtypeFields> for LeaveSubtype {
    type Error = AppError;

    fn try_from(fields: LeaveSubtypeFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.id,
            fields.leave_type_id,
            fields.code,
            fields.name,
            fields.description,
            fields.is_active,
            fields.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn codes_are_trimmed_and_lowercased() {
        let code = LeaveCode::new(" Paid ");
        assert!(code.is_ok());
        assert_eq!(code.unwrap_or_else(|_| unreachable!()).as_str(), "paid");
    }

    #[test]
    fn blank_code_is_rejected() {
        assert!(LeaveCode::new("   ").is_err());
    }

    #[test]
    fn policy_codes_allow_longer_values() {
        let code = "p".repeat(POLICY_CODE_MAX_CHARS);
        assert!(LeaveCode::new(&code).is_err());
        assert!(LeaveCode::for_policy(&code).is_ok());
        assert!(LeaveCode::for_policy(format!("{code}x")).is_err());
    }

    #[test]
    fn blank_description_becomes_none() {
        let leave_type = LeaveType::new(
            LeaveTypeId::new(),
            "unpaid",
            " Unpaid leave ",
            Some("   ".to_owned()),
            true,
            Utc::now(),
        );
        assert!(leave_type.is_ok());
        let leave_type = leave_type.unwrap_or_else(|_| unreachable!());
        assert_eq!(leave_type.name().as_str(), "Unpaid leave");
        assert_eq!(leave_type.description(), None);
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let subtype = LeaveSubtype::new(
            LeaveSubtypeId::new(),
            LeaveTypeId::new(),
            "vacation",
            "n".repeat(NAME_MAX_CHARS + 1),
            None,
            true,
            Utc::now(),
        );
        assert!(matches!(subtype, Err(AppError::Validation(_))));

        let subtype = LeaveSubtype::new(
            LeaveSubtypeId::new(),
            LeaveTypeId::new(),
            "vacation",
            "Vacation",
            Some("d".repeat(DESCRIPTION_MAX_CHARS + 1)),
            true,
            Utc::now(),
        );
        assert!(matches!(subtype, Err(AppError::Validation(_))));
    }

    #[test]
    fn deserialized_entities_keep_the_type_code_limit() {
        let leave_type = LeaveType::new(
            LeaveTypeId::new(),
            "paid",
            "Paid leave",
            None,
            true,
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!());
        let encoded = serde_json::to_value(&leave_type).unwrap_or_else(|_| unreachable!());
        let decoded = serde_json::from_value::<LeaveType>(encoded.clone());
        assert!(matches!(decoded, Ok(ref value) if *value == leave_type));

        let mut overlong = encoded;
        overlong["code"] = serde_json::Value::String("c".repeat(CODE_MAX_CHARS + 1));
        assert!(serde_json::from_value::<LeaveType>(overlong).is_err());

        let subtype = serde_json::from_value::<LeaveSubtype>(serde_json::json!({
            "id": LeaveSubtypeId::new(),
            "leave_type_id": leave_type.id(),
            "code": "c".repeat(CODE_MAX_CHARS + 1),
            "name": "Vacation",
            "description": null,
            "is_active": true,
            "created_at": Utc::now(),
        }));
        assert!(subtype.is_err());

        let subtype = serde_json::from_value::<LeaveSubtype>(serde_json::json!({
            "id": LeaveSubtypeId::new(),
            "leave_type_id": leave_type.id(),
            "code": " VAC ",
            "name": "Vacation",
            "description": "  ",
            "is_active": true,
            "created_at": Utc::now(),
        }));
        assert!(subtype.is_ok());
        let subtype = subtype.unwrap_or_else(|_| unreachable!());
        assert_eq!(subtype.code().as_str(), "vac");
        assert_eq!(subtype.description(), None);
    }
}
