use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Parses an identifier from its hyphenated transport form.
            pub fn parse(value: &str) -> dressrosa_core::AppResult<Self> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
                    dressrosa_core::AppError::Validation(format!(
                        "invalid {} '{value}': {error}",
                        stringify!($name)
                    ))
                })
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a user record.
    UserId
);
uuid_identifier!(
    /// Unique identifier for a role record.
    RoleId
);
uuid_identifier!(
    /// Unique identifier for a leave type.
    LeaveTypeId
);
uuid_identifier!(
    /// Unique identifier for a leave subtype.
    LeaveSubtypeId
);
uuid_identifier!(
    /// Unique identifier for a leave policy.
    LeavePolicyId
);
