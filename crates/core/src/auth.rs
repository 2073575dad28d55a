use serde::{Deserialize, Serialize};

/// Identity of an authenticated user, resolved from a bearer token or a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    username: String,
    email: Option<String>,
    is_active: bool,
}

impl UserIdentity {
    /// Creates a user identity from the stored account data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        username: impl Into<String>,
        email: Option<String>,
        is_active: bool,
    ) -> Self {
        Self {
            subject: subject.into(),
            username: username.into(),
            email,
            is_active,
        }
    }

    /// Returns the stable subject, the user identifier in string form.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the email, if the account has one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns whether the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}
