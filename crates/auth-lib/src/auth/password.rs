// ============================
// auth-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use zeroize::Zeroize;

/// Failures in the hashing layer
///
/// Both variants are internal faults: a malformed stored hash means the
/// store handed back a corrupt record, not that the caller typed the wrong
/// password.
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),

    #[error("stored password hash is unusable: {0}")]
    MalformedHash(argon2::password_hash::Error),
}

/// Hash a password using argon2 with a fresh random salt
///
/// Two calls with the same input produce different hashes; both verify.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(PasswordError::Hashing)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash
///
/// `Ok(false)` is a mismatch. `Err` means the stored hash itself could not
/// be used and must surface as an internal fault, not a failed login.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e)),
    }
}

/// Securely hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String) -> Result<String, PasswordError> {
    let hash = hash_password(plain)?;
    plain.zeroize();
    Ok(hash)
}
