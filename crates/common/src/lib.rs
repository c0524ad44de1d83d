// ================
// common/src/lib.rs
// ================
//! Shared account types
//! used at the boundary between the `Rollcall` core and its callers.
//! This module defines the persisted account record, its outward view,
//! and the outcome shapes returned by the auth operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque surrogate key assigned to an account at creation
pub type AccountId = Uuid;

/// Field identifier for username-scoped errors
pub const USERNAME_FIELD: &str = "username";

/// Field identifier for password-scoped errors
pub const PASSWORD_FIELD: &str = "password";

/// An account as the store persists it
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    /// Unique identity, assigned at creation, never reassigned
    pub id: AccountId,
    /// Unique username, case-sensitive
    pub username: String,
    /// Salted one-way hash of the password, never the plaintext
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// The outward view of an account: everything except the credential
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountInfo {
    /// Account identity
    pub id: AccountId,
    /// Username
    pub username: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        AccountInfo {
            id: account.id,
            username: account.username.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl From<Account> for AccountInfo {
    fn from(account: Account) -> Self {
        AccountInfo {
            id: account.id,
            username: account.username,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// A validation or business error tied to a single input field
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Which input field the message applies to
    pub field: String,
    /// Human-readable description
    pub message: String,
}

impl FieldError {
    /// Build a field error from any pair of string-likes
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome record returned to callers of the mutating auth operations
///
/// Exactly one side is populated: `account` on success, `errors` on a
/// validation or business rejection.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AuthResponse {
    /// The authenticated account, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountInfo>,
    /// Field-scoped errors, present on rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}
