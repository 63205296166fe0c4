//! Input validation for portal usernames and licmgr codes.
//!
//! Everything here runs before any remote or process call, so a malformed
//! argument never reaches the portal or the license manager.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap();

    // Only the end is anchored. licmgr has always accepted this shape, so a
    // code with extra leading characters still passes.
    static ref CODE_REGEX: Regex =
        Regex::new(r"[A-Za-z0-9]{8}-[A-Za-z0-9]{8}-[A-Za-z0-9]{8}-[A-Za-z0-9]{8}$").unwrap();
}

/// Validation error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check whether the username takes the form of a standard email address.
///
/// # Example
/// ```
/// use cristie::validation::is_valid_email;
///
/// assert!(is_valid_email("user@company.co.uk"));
/// assert!(!is_valid_email("user.company.co.uk"));
/// ```
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Check an activation or contract code of the form
/// `XXXXXXXX-XXXXXXXX-XXXXXXXX-XXXXXXXX`.
///
/// # Example
/// ```
/// use cristie::validation::is_valid_code;
///
/// assert!(is_valid_code("ABCD1234-EFGH5678-IJKL9012-MNOP3456"));
/// assert!(!is_valid_code("ABCD1234-EFGH5678-IJKL9012"));
/// ```
pub fn is_valid_code(value: &str) -> bool {
    CODE_REGEX.is_match(value)
}

/// Validate a portal username.
pub fn validate_email(value: &str, field_name: &str) -> ValidationResult<()> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ValidationError {
            field: field_name.to_string(),
            message: "please ensure the username is an email address".to_string(),
        })
    }
}

/// Validate a contract or activation code.
pub fn validate_code(value: &str, field_name: &str) -> ValidationResult<()> {
    if is_valid_code(value) {
        Ok(())
    } else {
        Err(ValidationError {
            field: field_name.to_string(),
            message: "invalid code format, use XXXXXXXX-XXXXXXXX-XXXXXXXX-XXXXXXXX".to_string(),
        })
    }
}
