// ============================
// auth-lib/src/auth/session.rs
// ============================
//! Per-caller session state and the session registry.
use std::collections::HashMap;
use std::sync::Arc;

use ::metrics::{counter, gauge};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use rollcall_common::AccountId;

use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED};

/// Claim key under which the authenticated identity is stored
pub const USER_ID_CLAIM: &str = "userId";

/// One caller's session: an opaque bag of named claims
///
/// Claims are plain JSON values; writes are last-write-wins. The auth core
/// only ever stores the account identity under [`USER_ID_CLAIM`], never the
/// account object itself.
#[derive(Clone, Default)]
pub struct Session {
    claims: Arc<RwLock<HashMap<String, Value>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a claim by key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.claims.read().get(key).cloned()
    }

    /// Write a claim, replacing any previous value
    pub fn insert(&self, key: &str, value: Value) {
        self.claims.write().insert(key.to_string(), value);
    }

    /// Drop a claim, returning the previous value if any
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.claims.write().remove(key)
    }

    /// The authenticated account identity, if one has been established
    ///
    /// A claim that does not parse as an identity counts as absent; only an
    /// external writer can produce such a value.
    pub fn account_id(&self) -> Option<AccountId> {
        self.get(USER_ID_CLAIM)
            .and_then(|value| value.as_str().and_then(|s| Uuid::parse_str(s).ok()))
    }

    /// Record the authenticated account identity
    pub fn set_account_id(&self, id: AccountId) {
        self.insert(USER_ID_CLAIM, Value::String(id.to_string()));
    }
}

/// Registry of live sessions keyed by token
///
/// Session lifetime (expiry, logout) belongs to the surrounding session
/// subsystem; the registry only creates, resolves, and ends bags.
pub struct SessionManager {
    sessions: DashMap<String, Session>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new() -> Self {
        SessionManager {
            sessions: DashMap::new(),
        }
    }

    /// Create a session and hand back its token and claim bag
    pub fn create(&self) -> (String, Session) {
        let token = Uuid::new_v4().to_string();
        let session = Session::new();
        self.sessions.insert(token.clone(), session.clone());

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);

        (token, session)
    }

    /// Get a session by token
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Remove a session; external logout flows call this
    pub fn end(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            gauge!(SESSION_ACTIVE).set(self.sessions.len() as f64);
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
