//! Session management — authentication state and session persistence.
//!
//! `SessionManager` owns the one active session per process.  It does
//! not verify credentials against an identity provider (that is an
//! external collaborator); its job is session issuance, persistence,
//! restore at startup, and the secret-bearing teardown on logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{self, SALT_LEN};
use crate::errors::{Result, SecureVaultError};
use crate::storage::PersistenceAdapter;
use crate::vault::record::random_id;
use crate::vault::snapshot::{base64_decode, base64_encode};
use crate::vault::VaultStore;

/// Blob key under which the session identity is persisted.
const SESSION_KEY: &str = "session";

/// An authenticated context scoping exactly one active vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Stable opaque identifier for this session's user.
    pub user_id: String,

    /// Descriptive, non-authoritative display name.
    pub display_name: String,

    /// Descriptive, non-authoritative email / login identifier.
    pub email: String,

    /// Random salt feeding the vault key derivation for this session
    /// (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub kdf_salt: Vec<u8>,

    /// When this session was established.
    pub created_at: DateTime<Utc>,
}

/// Owns authentication state and the persisted session identity.
pub struct SessionManager {
    storage: Arc<dyn PersistenceAdapter>,
    active: Option<Session>,
}

impl SessionManager {
    /// Create a manager with no active session.
    pub fn new(storage: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            storage,
            active: None,
        }
    }

    /// Establish a session for `identifier`.
    ///
    /// Fails with `InvalidCredential` when either input is blank after
    /// trimming.  The proof itself is not verified here — credential
    /// verification policy belongs to an external identity provider;
    /// this core only issues and stores the session.
    pub fn authenticate(&mut self, identifier: &str, proof: &str) -> Result<Session> {
        let identifier = identifier.trim();
        if identifier.is_empty() || proof.trim().is_empty() {
            return Err(SecureVaultError::InvalidCredential);
        }

        // Display name from the identifier's local part:
        // "alice@example.com" -> "alice".
        let display_name = identifier
            .split('@')
            .next()
            .unwrap_or(identifier)
            .to_string();

        let session = Session {
            user_id: random_id("user")?,
            display_name,
            email: identifier.to_string(),
            kdf_salt: kdf::generate_salt()?.to_vec(),
            created_at: Utc::now(),
        };

        let bytes = serde_json::to_vec(&session)
            .map_err(|e| SecureVaultError::SerializationError(format!("session: {e}")))?;
        self.storage.write_blob(SESSION_KEY, &bytes)?;

        self.active = Some(session.clone());
        Ok(session)
    }

    /// Restore the persisted session identity at startup.
    ///
    /// Absent or malformed data is treated as "no session", never as a
    /// fatal error.
    pub fn restore_session(&mut self) -> Result<Option<Session>> {
        let Some(bytes) = self.storage.read_blob(SESSION_KEY)? else {
            return Ok(None);
        };

        let session: Session = match serde_json::from_slice(&bytes) {
            Ok(s) => s,
            Err(_) => return Ok(None),
        };

        // A session without usable key material cannot unlock anything.
        if session.user_id.is_empty() || session.kdf_salt.len() != SALT_LEN {
            return Ok(None);
        }

        self.active = Some(session.clone());
        Ok(Some(session))
    }

    /// End the active session: clear the persisted identity and tear
    /// down all vault state tied to it, in memory and on disk.
    ///
    /// Idempotent — ending with no active session is a no-op.
    pub fn end_session(&mut self, vault: &mut VaultStore) -> Result<()> {
        vault.clear()?;

        // The vault may never have been loaded this process; delete
        // its snapshot blob by key so nothing durable survives logout.
        // delete_blob is idempotent, so doubling up with clear() is fine.
        if let Some(session) = &self.active {
            self.storage
                .delete_blob(&VaultStore::blob_key_for(&session.user_id))?;
        }

        self.storage.delete_blob(SESSION_KEY)?;
        self.active = None;
        Ok(())
    }

    /// The currently active session, if any.
    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Returns `true` when a session is active.
    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn authenticate_rejects_blank_inputs() {
        let mut mgr = manager();
        assert!(matches!(
            mgr.authenticate("", "secret"),
            Err(SecureVaultError::InvalidCredential)
        ));
        assert!(matches!(
            mgr.authenticate("a@b.com", "   "),
            Err(SecureVaultError::InvalidCredential)
        ));
        assert!(!mgr.is_authenticated());
    }

    #[test]
    fn authenticate_builds_display_name_from_local_part() {
        let mut mgr = manager();
        let session = mgr.authenticate("alice@example.com", "pw").unwrap();
        assert_eq!(session.display_name, "alice");
        assert_eq!(session.email, "alice@example.com");
        assert!(session.user_id.starts_with("user_"));
        assert_eq!(session.kdf_salt.len(), SALT_LEN);
    }

    #[test]
    fn restore_returns_none_for_malformed_blob() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write_blob(SESSION_KEY, b"not json at all").unwrap();

        let mut mgr = SessionManager::new(storage);
        assert!(mgr.restore_session().unwrap().is_none());
        assert!(!mgr.is_authenticated());
    }

    #[test]
    fn restore_roundtrips_a_persisted_session() {
        let storage: Arc<dyn PersistenceAdapter> = Arc::new(MemoryStorage::new());

        let mut mgr = SessionManager::new(Arc::clone(&storage));
        let session = mgr.authenticate("bob@example.com", "pw").unwrap();

        // A fresh manager over the same storage sees the session.
        let mut mgr2 = SessionManager::new(storage);
        let restored = mgr2.restore_session().unwrap().expect("session persisted");
        assert_eq!(restored.user_id, session.user_id);
        assert_eq!(restored.kdf_salt, session.kdf_salt);
    }
}
