// ============================
// auth-lib/src/auth/service.rs
// ============================
//! The authentication pipelines: register, login, and session-bound
//! identity lookup.
use std::sync::Arc;

use ::metrics::counter;
use tracing::{info, warn};

use rollcall_common::{Account, AuthResponse, FieldError, PASSWORD_FIELD, USERNAME_FIELD};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::Session;
use crate::error::AuthError;
use crate::metrics::{ACCOUNT_CREATED, LOGIN_OK, LOGIN_REJECTED};
use crate::store::{AccountStore, StoreError};
use crate::validation;

/// Outcome of a register or login attempt
///
/// A rejection carries at least one field-scoped error. Internal faults are
/// reported through [`AuthError`] instead and never appear here, so exactly
/// one of account and errors is ever authoritative.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// The caller is authenticated as this account
    Granted(Account),
    /// The attempt was rejected; the errors say which inputs to fix
    Rejected(Vec<FieldError>),
}

impl AuthOutcome {
    fn rejected(field: &str, message: &str) -> Self {
        AuthOutcome::Rejected(vec![FieldError::new(field, message)])
    }

    /// The granted account, if the attempt succeeded
    pub fn account(&self) -> Option<&Account> {
        match self {
            AuthOutcome::Granted(account) => Some(account),
            AuthOutcome::Rejected(_) => None,
        }
    }

    /// The rejection errors, if the attempt failed
    pub fn errors(&self) -> Option<&[FieldError]> {
        match self {
            AuthOutcome::Granted(_) => None,
            AuthOutcome::Rejected(errors) => Some(errors),
        }
    }
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::Granted(account) => AuthResponse {
                account: Some((&account).into()),
                errors: None,
            },
            AuthOutcome::Rejected(errors) => AuthResponse {
                account: None,
                errors: Some(errors),
            },
        }
    }
}

/// Orchestrates the validator, the hasher, the account store, and the
/// caller's session
///
/// Stateless per invocation: every call receives the caller's session
/// explicitly, and nothing is carried over between calls.
#[derive(Clone)]
pub struct AuthService<S> {
    store: Arc<S>,
}

impl<S: AccountStore> AuthService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a new account and sign the caller in
    ///
    /// Username validity is checked before password validity, both before
    /// hashing; the session claim is written only after the store confirms
    /// the account exists.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        session: &Session,
    ) -> Result<AuthOutcome, AuthError> {
        if let Some(error) = validation::validate_credentials(username, password) {
            return Ok(AuthOutcome::Rejected(vec![error]));
        }

        let password_hash = hash_password(password)?;

        let account = match self.store.create(username, &password_hash).await {
            Ok(account) => account,
            Err(StoreError::UsernameTaken) => {
                return Ok(AuthOutcome::rejected(USERNAME_FIELD, "already taken"));
            },
            Err(error) => {
                warn!(username, error = %error, "account creation failed");
                return Err(AuthError::Store(error));
            },
        };

        session.set_account_id(account.id);
        counter!(ACCOUNT_CREATED).increment(1);
        info!(username, account_id = %account.id, "account registered");

        Ok(AuthOutcome::Granted(account))
    }

    /// Authenticate an existing account and sign the caller in
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        session: &Session,
    ) -> Result<AuthOutcome, AuthError> {
        let Some(account) = self.store.find_by_username(username).await? else {
            counter!(LOGIN_REJECTED).increment(1);
            return Ok(AuthOutcome::rejected(USERNAME_FIELD, "username does not exists"));
        };

        if !verify_password(&account.password_hash, password)? {
            counter!(LOGIN_REJECTED).increment(1);
            return Ok(AuthOutcome::rejected(PASSWORD_FIELD, "password is incorrect"));
        }

        session.set_account_id(account.id);
        counter!(LOGIN_OK).increment(1);
        info!(username, account_id = %account.id, "login succeeded");

        Ok(AuthOutcome::Granted(account))
    }

    /// Resolve the caller's session claim to an account, if any
    ///
    /// An absent claim and a claim pointing at a since-deleted account both
    /// yield `None`; neither is an error.
    pub async fn current_account(&self, session: &Session) -> Result<Option<Account>, AuthError> {
        let Some(id) = session.account_id() else {
            return Ok(None);
        };

        Ok(self.store.find_by_id(id).await?)
    }
}
