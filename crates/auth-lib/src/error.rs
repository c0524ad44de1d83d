// crates/auth-lib/src/error.rs

//! Central error type for internal faults.
use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Faults that are not the caller's to fix
///
/// Validation and business rejections travel in the outcome's field-error
/// list. Anything here means the subsystem itself failed: the caller should
/// retry later or alert, not correct its input. The core never retries on
/// its own.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The account store failed for a reason other than a uniqueness conflict
    #[error("account store failure: {0}")]
    Store(#[from] StoreError),

    /// A stored credential could not be hashed or verified
    #[error("credential processing failure: {0}")]
    Password(#[from] PasswordError),
}
