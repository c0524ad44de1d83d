//! End-to-end register / login / identity-lookup flows over the assembled
//! application state, including store doubles proving what the pipelines
//! must NOT do: no store call on invalid input, no session write without a
//! durably created account.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use auth_lib::auth::{AuthOutcome, Session};
use auth_lib::config::Settings;
use auth_lib::error::AuthError;
use auth_lib::store::{
    AccountStore, FlatFileAccountStore, MemoryAccountStore, StoreError,
};
use auth_lib::AppState;
use rollcall_common::{Account, AccountId, AuthResponse};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn memory_state() -> AppState<MemoryAccountStore> {
    AppState::new(MemoryAccountStore::new(), Settings::default())
}

/// Store double that counts calls and can be told to fail `create`
#[derive(Clone, Default)]
struct InstrumentedStore {
    inner: MemoryAccountStore,
    create_calls: Arc<AtomicUsize>,
    find_calls: Arc<AtomicUsize>,
    fail_create: Arc<AtomicBool>,
}

#[async_trait]
impl AccountStore for InstrumentedStore {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_username(username).await
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "backing store offline",
            )));
        }
        self.inner.create(username, password_hash).await
    }
}

#[tokio::test]
async fn register_rejects_short_username_without_touching_the_store() {
    let store = InstrumentedStore::default();
    let state = AppState::new(store.clone(), Settings::default());
    let session = Session::new();

    let outcome = state.auth.register("ab", "abcd", &session).await.unwrap();
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "username");
    assert_eq!(errors[0].message, "length must be greater than 2");

    assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.find_calls.load(Ordering::SeqCst), 0);
    assert!(session.account_id().is_none());
}

#[tokio::test]
async fn register_rejects_short_password_before_hashing_or_storing() {
    let store = InstrumentedStore::default();
    let state = AppState::new(store.clone(), Settings::default());
    let session = Session::new();

    let outcome = state.auth.register("alice", "abc", &session).await.unwrap();
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "password");
    assert_eq!(errors[0].message, "length must be greater than 3");

    assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
    assert!(session.account_id().is_none());
}

#[tokio::test]
async fn register_checks_username_before_password() {
    let state = memory_state();
    let session = Session::new();

    // both inputs invalid: only the username error comes back
    let outcome = state.auth.register("ab", "abc", &session).await.unwrap();
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "username");
}

#[tokio::test]
async fn register_success_signs_the_caller_in() {
    init_tracing();
    let state = memory_state();
    let session = Session::new();

    let outcome = state
        .auth
        .register("alice", "secret1", &session)
        .await
        .unwrap();
    let account = outcome.account().expect("registration should succeed");

    assert_eq!(account.username, "alice");
    assert!(!account.password_hash.is_empty());
    assert_ne!(account.password_hash, "secret1");
    assert_eq!(session.account_id(), Some(account.id));
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict_not_a_second_account() {
    let store = MemoryAccountStore::new();
    let state = AppState::new(store.clone(), Settings::default());

    let first_session = Session::new();
    let first = state
        .auth
        .register("alice", "secret1", &first_session)
        .await
        .unwrap();
    let first_id = first.account().unwrap().id;

    let second_session = Session::new();
    let second = state
        .auth
        .register("alice", "secret1", &second_session)
        .await
        .unwrap();
    let errors = second.errors().expect("duplicate must be rejected");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "username");
    assert_eq!(errors[0].message, "already taken");

    // the conflicting caller is not signed in, and the original record stands
    assert!(second_session.account_id().is_none());
    let kept = store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(kept.id, first_id);
}

#[tokio::test]
async fn login_with_unknown_username_is_username_scoped() {
    let state = memory_state();
    let session = Session::new();

    let outcome = state
        .auth
        .login("ghost", "anything", &session)
        .await
        .unwrap();
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "username");
    assert_eq!(errors[0].message, "username does not exists");
    assert!(session.account_id().is_none());
}

#[tokio::test]
async fn login_with_wrong_password_leaves_the_session_untouched() {
    let state = memory_state();
    let register_session = Session::new();
    state
        .auth
        .register("alice", "secret1", &register_session)
        .await
        .unwrap();

    let login_session = Session::new();
    let outcome = state
        .auth
        .login("alice", "wrongpass", &login_session)
        .await
        .unwrap();
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "password");
    assert_eq!(errors[0].message, "password is incorrect");
    assert!(login_session.account_id().is_none());
}

#[tokio::test]
async fn login_then_identity_lookup_round_trips() {
    init_tracing();
    let state = memory_state();
    let register_session = Session::new();
    state
        .auth
        .register("alice", "secret1", &register_session)
        .await
        .unwrap();

    let (_token, login_session) = state.sessions.create();
    let outcome = state
        .auth
        .login("alice", "secret1", &login_session)
        .await
        .unwrap();
    let account = outcome.account().expect("login should succeed");

    let me = state
        .auth
        .current_account(&login_session)
        .await
        .unwrap()
        .expect("identity lookup should resolve");
    assert_eq!(me.id, account.id);
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn identity_lookup_without_a_claim_is_absent() {
    let state = memory_state();
    let session = Session::new();

    assert!(state.auth.current_account(&session).await.unwrap().is_none());
}

#[tokio::test]
async fn identity_lookup_with_a_stale_claim_is_absent_not_an_error() {
    let state = memory_state();
    let session = Session::new();

    // claim points at an account the store has never seen (or has deleted)
    session.set_account_id(uuid::Uuid::new_v4());
    assert!(state.auth.current_account(&session).await.unwrap().is_none());
}

#[tokio::test]
async fn store_failure_is_an_internal_error_and_no_session_write() {
    let store = InstrumentedStore::default();
    store.fail_create.store(true, Ordering::SeqCst);
    let state = AppState::new(store.clone(), Settings::default());
    let session = Session::new();

    let result = state.auth.register("alice", "secret1", &session).await;
    match result {
        Err(AuthError::Store(StoreError::Io(_))) => {},
        other => panic!("expected an internal store error, got {other:?}"),
    }

    // the pipeline stopped before the session mutation
    assert!(session.account_id().is_none());
}

#[tokio::test]
async fn corrupt_stored_hash_surfaces_as_an_internal_fault() {
    let store = MemoryAccountStore::new();
    // plant a record whose hash is not a valid PHC string
    store.create("alice", "corrupt").await.unwrap();
    let state = AppState::new(store, Settings::default());
    let session = Session::new();

    let result = state.auth.login("alice", "secret1", &session).await;
    assert!(matches!(result, Err(AuthError::Password(_))));
    assert!(session.account_id().is_none());
}

#[tokio::test]
async fn flat_file_backed_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FlatFileAccountStore::new(dir.path()).unwrap();
        let state = AppState::new(store, Settings::default());
        let session = Session::new();
        state
            .auth
            .register("alice", "secret1", &session)
            .await
            .unwrap();
    }

    let store = FlatFileAccountStore::new(dir.path()).unwrap();
    let state = AppState::new(store, Settings::default());
    let session = Session::new();
    let outcome = state
        .auth
        .login("alice", "secret1", &session)
        .await
        .unwrap();
    assert!(outcome.account().is_some());
    assert!(session.account_id().is_some());
}

#[tokio::test]
async fn outcome_converts_to_the_wire_shape_with_one_side_populated() {
    let state = memory_state();
    let session = Session::new();

    let granted = state
        .auth
        .register("alice", "secret1", &session)
        .await
        .unwrap();
    let response = AuthResponse::from(granted);
    assert!(response.account.is_some());
    assert!(response.errors.is_none());
    // the outward view never carries the credential
    let json = serde_json::to_value(&response).unwrap();
    assert!(json["account"].get("password_hash").is_none());

    let rejected = state
        .auth
        .register("alice", "secret1", &session)
        .await
        .unwrap();
    assert!(matches!(rejected, AuthOutcome::Rejected(_)));
    let response = AuthResponse::from(rejected);
    assert!(response.account.is_none());
    assert_eq!(response.errors.unwrap().len(), 1);
}
