// ============================
// crates/auth-lib/src/validation/mod.rs
// ============================
//! Credential validation rules.
//!
//! Two rules, checked in fixed order: usernames must be longer than two
//! bytes, passwords longer than three. No charset or whitespace
//! constraints. Pure functions, no I/O.

use rollcall_common::{FieldError, PASSWORD_FIELD, USERNAME_FIELD};

/// Validate a username
pub fn validate_username(username: &str) -> Option<FieldError> {
    if username.len() <= 2 {
        return Some(FieldError::new(
            USERNAME_FIELD,
            "length must be greater than 2",
        ));
    }

    None
}

/// Validate a password
pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.len() <= 3 {
        return Some(FieldError::new(
            PASSWORD_FIELD,
            "length must be greater than 3",
        ));
    }

    None
}

/// Validate a credential pair
///
/// The username rule runs before the password rule; the first failing rule
/// wins, so at most one error comes back per call.
pub fn validate_credentials(username: &str, password: &str) -> Option<FieldError> {
    validate_username(username).or_else(|| validate_password(password))
}
