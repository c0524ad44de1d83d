// ============================
// auth-lib/src/store.rs
// ============================
//! Account store gateway with in-memory and flat-file implementations.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tokio::{fs as tokio_fs, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

use rollcall_common::{Account, AccountId};

/// Errors surfaced by the account store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Uniqueness conflict: the username is already held by another account
    #[error("username is already taken")]
    UsernameTaken,

    /// I/O failure in the backing medium
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record could not be encoded or decoded
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Trait for account store backends
///
/// Username uniqueness is enforced here, atomically with `create`; callers
/// react to `UsernameTaken` rather than checking first. No failure may be
/// swallowed: every variant reaches the caller.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by identity; absence is not an error
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Look up an account by username; absence is not an error
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Persist a new account, failing with `UsernameTaken` on a duplicate
    async fn create(&self, username: &str, password_hash: &str)
        -> Result<Account, StoreError>;
}

fn new_account(username: &str, password_hash: &str) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// In-memory implementation of the `AccountStore` trait
///
/// Accounts are keyed by username, so `create` is a single atomic
/// compare-and-insert even under concurrent registration.
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<DashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(username).map(|entry| entry.value().clone()))
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        match self.accounts.entry(username.to_string()) {
            Entry::Occupied(_) => Err(StoreError::UsernameTaken),
            Entry::Vacant(slot) => {
                let account = new_account(username, password_hash);
                slot.insert(account.clone());
                Ok(account)
            },
        }
    }
}

/// Flat-file implementation of the `AccountStore` trait
///
/// All accounts live in one JSON document under the data directory. The
/// write lock makes `create` a compare-and-create against the latest state.
#[derive(Clone)]
pub struct FlatFileAccountStore {
    path: PathBuf,
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl FlatFileAccountStore {
    /// Open the store rooted at `data_dir`, loading any existing accounts
    pub fn new<P: AsRef<Path>>(data_dir: P) -> anyhow::Result<Self> {
        let root = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;

        let path = root.join("accounts.json");
        let accounts: HashMap<String, Account> = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };
        debug!(count = accounts.len(), path = %path.display(), "account store opened");

        Ok(Self {
            path,
            accounts: Arc::new(RwLock::new(accounts)),
        })
    }

    async fn persist(&self, accounts: &HashMap<String, Account>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(accounts)?;
        tokio_fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for FlatFileAccountStore {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|account| account.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).cloned())
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(username) {
            return Err(StoreError::UsernameTaken);
        }

        let account = new_account(username, password_hash);
        accounts.insert(username.to_string(), account.clone());

        // roll the map back if the write never reached disk, so memory and
        // file cannot disagree about which accounts exist
        if let Err(error) = self.persist(&accounts).await {
            accounts.remove(username);
            return Err(error);
        }

        Ok(account)
    }
}
