//! Integration tests for session lifecycle and teardown.

use std::sync::Arc;

use securevault::crypto::KdfParams;
use securevault::errors::SecureVaultError;
use securevault::session::SessionManager;
use securevault::storage::{MemoryStorage, PersistenceAdapter};
use securevault::vault::VaultStore;

/// Cheap Argon2 settings so tests stay fast.
fn fast_params() -> KdfParams {
    KdfParams {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

#[test]
fn restore_sees_session_from_previous_process() {
    let storage: Arc<dyn PersistenceAdapter> = Arc::new(MemoryStorage::new());

    let mut sessions = SessionManager::new(Arc::clone(&storage));
    let session = sessions.authenticate("alice@example.com", "pw").unwrap();

    // Simulate a process restart: a fresh manager over the same storage.
    let mut sessions2 = SessionManager::new(storage);
    let restored = sessions2.restore_session().unwrap().expect("persisted");
    assert_eq!(restored.user_id, session.user_id);
    assert_eq!(restored.email, "alice@example.com");
}

#[test]
fn restore_with_empty_storage_is_none() {
    let mut sessions = SessionManager::new(Arc::new(MemoryStorage::new()));
    assert!(sessions.restore_session().unwrap().is_none());
}

#[test]
fn end_session_wipes_identity_and_vault_blobs() {
    let storage: Arc<dyn PersistenceAdapter> = Arc::new(MemoryStorage::new());
    let mut sessions = SessionManager::new(Arc::clone(&storage));
    let mut vault = VaultStore::new(Arc::clone(&storage), fast_params(), true);

    let session = sessions.authenticate("bob@example.com", "pw").unwrap();
    vault.load(&session).unwrap();

    let vault_key = format!("vault/{}", session.user_id);
    assert!(storage.read_blob("session").unwrap().is_some());
    assert!(storage.read_blob(&vault_key).unwrap().is_some());

    sessions.end_session(&mut vault).unwrap();

    assert!(storage.read_blob("session").unwrap().is_none());
    assert!(storage.read_blob(&vault_key).unwrap().is_none());
    assert!(!sessions.is_authenticated());
}

#[test]
fn end_session_tears_down_even_without_a_loaded_vault() {
    let storage: Arc<dyn PersistenceAdapter> = Arc::new(MemoryStorage::new());
    let mut sessions = SessionManager::new(Arc::clone(&storage));
    let mut vault = VaultStore::new(Arc::clone(&storage), fast_params(), true);

    let session = sessions.authenticate("carol@example.com", "pw").unwrap();
    vault.load(&session).unwrap();
    let vault_key = format!("vault/{}", session.user_id);

    // A second process restores the session but never loads the vault.
    let mut sessions2 = SessionManager::new(Arc::clone(&storage));
    sessions2.restore_session().unwrap().expect("persisted");
    let mut unloaded_vault = VaultStore::new(Arc::clone(&storage), fast_params(), true);

    sessions2.end_session(&mut unloaded_vault).unwrap();

    assert!(storage.read_blob("session").unwrap().is_none());
    assert!(storage.read_blob(&vault_key).unwrap().is_none());
}

#[test]
fn end_session_is_idempotent() {
    let storage: Arc<dyn PersistenceAdapter> = Arc::new(MemoryStorage::new());
    let mut sessions = SessionManager::new(Arc::clone(&storage));
    let mut vault = VaultStore::new(Arc::clone(&storage), fast_params(), false);

    let session = sessions.authenticate("dan@example.com", "pw").unwrap();
    vault.load(&session).unwrap();

    sessions.end_session(&mut vault).unwrap();
    // Second teardown with nothing left must still succeed.
    sessions.end_session(&mut vault).unwrap();
}

#[test]
fn vault_operations_fail_after_teardown() {
    let storage: Arc<dyn PersistenceAdapter> = Arc::new(MemoryStorage::new());
    let mut sessions = SessionManager::new(Arc::clone(&storage));
    let mut vault = VaultStore::new(storage, fast_params(), false);

    let session = sessions.authenticate("erin@example.com", "pw").unwrap();
    vault.load(&session).unwrap();
    sessions.end_session(&mut vault).unwrap();

    assert!(matches!(
        vault.search(""),
        Err(SecureVaultError::NoActiveSession)
    ));
    assert!(matches!(
        vault.remove("entry_whatever"),
        Err(SecureVaultError::NoActiveSession)
    ));
    assert!(matches!(
        vault.serialize_snapshot(),
        Err(SecureVaultError::NoActiveSession)
    ));
}
