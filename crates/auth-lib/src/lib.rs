// ============================
// auth-lib/src/lib.rs
// ============================
//! Core library for the `Rollcall` account subsystem: credential
//! validation, password hashing, the account store gateway, and
//! session-bound identity.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, SessionManager};
use crate::config::Settings;
use crate::store::{AccountStore, FlatFileAccountStore};

/// Application state shared across all callers
#[derive(Clone)]
pub struct AppState<S> {
    /// Authentication service
    pub auth: AuthService<S>,
    /// Session registry
    pub sessions: Arc<SessionManager>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl<S: AccountStore> AppState<S> {
    /// Create application state over the given account store
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            auth: AuthService::new(Arc::new(store)),
            sessions: Arc::new(SessionManager::new()),
            settings: Arc::new(settings),
        }
    }
}

impl AppState<FlatFileAccountStore> {
    /// Create application state with loaded settings and a flat-file store
    pub fn new_default() -> anyhow::Result<Self> {
        let settings = Settings::load()?;
        let store = FlatFileAccountStore::new(&settings.data_dir)?;
        Ok(Self::new(store, settings))
    }
}
