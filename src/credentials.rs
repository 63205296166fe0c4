use std::fmt;

use crate::validation::{validate_email, ValidationResult};

/// Portal username and password.
///
/// Only ever held for the duration of one invocation. The password is kept
/// out of `Debug` output so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check the username is shaped like an email address.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_email(&self.username, "username")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password() {
        let creds = Credentials::new("ops@example.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ops@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn validate_rejects_non_email_username() {
        assert!(Credentials::new("ops", "pw").validate().is_err());
        assert!(Credentials::new("ops@example.com", "pw").validate().is_ok());
    }
}
