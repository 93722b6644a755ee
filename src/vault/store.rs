//! High-level vault operations used by the presentation layer.
//!
//! `VaultStore` owns the credential collection for the active session.
//! Every operation other than `load` requires a loaded vault and fails
//! with `NoActiveSession` otherwise.  The store moves through three
//! states:
//!
//! ```text
//! Uninitialized --load()--> Loaded --clear()--> Cleared --load()--> Loaded
//! ```
//!
//! Mutations take `&mut self`, so the read-modify-persist cycle is
//! serialized by the exclusive borrow; there is exactly one writer per
//! session.

use std::sync::Arc;

use chrono::Utc;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::kdf::KdfParams;
use crate::crypto::CryptoProvider;
use crate::errors::{Result, SecureVaultError};
use crate::session::Session;
use crate::storage::PersistenceAdapter;

use super::record::{random_id, CredentialRecord, RecordDraft, RecordPatch};
use super::snapshot;

/// Lifecycle state of the store.
enum VaultState {
    /// No `load` has happened yet.
    Uninitialized,
    /// A session's vault is in memory.
    Loaded(ActiveVault),
    /// The session ended; all vault state has been discarded.
    Cleared,
}

/// Everything that only exists while a session's vault is loaded.
struct ActiveVault {
    /// Storage key of this session's snapshot blob.
    blob_key: String,
    /// Session-keyed encryption front-end.
    provider: CryptoProvider,
    /// The records, insertion order preserved.
    records: Vec<CredentialRecord>,
}

/// The per-session credential collection and its persistence.
pub struct VaultStore {
    storage: Arc<dyn PersistenceAdapter>,
    kdf_params: KdfParams,
    seed_samples: bool,
    state: VaultState,
}

impl VaultStore {
    /// Create an uninitialized store over `storage`.
    ///
    /// `seed_samples` controls the first-run policy: when `true` and
    /// no snapshot exists for the session, `load` seeds the documented
    /// example records.
    pub fn new(storage: Arc<dyn PersistenceAdapter>, kdf_params: KdfParams, seed_samples: bool) -> Self {
        Self {
            storage,
            kdf_params,
            seed_samples,
            state: VaultState::Uninitialized,
        }
    }

    /// Storage key of the snapshot blob for `user_id`.
    pub(crate) fn blob_key_for(user_id: &str) -> String {
        format!("vault/{user_id}")
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Populate the store from durable storage for `session`.
    ///
    /// If no snapshot exists this is a first run: the example records
    /// are seeded (unless disabled) and persisted.  An existing
    /// snapshot is never overwritten by seeding.
    pub fn load(&mut self, session: &Session) -> Result<()> {
        let provider = CryptoProvider::for_session(session, &self.kdf_params)?;
        let blob_key = Self::blob_key_for(&session.user_id);

        let existing = self.storage.read_blob(&blob_key)?;
        let first_run = existing.is_none();

        let records = match existing {
            Some(bytes) => {
                let mut integrity_key = provider.integrity_key()?;
                let records = snapshot::decode_snapshot(&bytes, &integrity_key);
                integrity_key.zeroize();
                records?
            }
            None => {
                if self.seed_samples {
                    seed_records(&provider)?
                } else {
                    Vec::new()
                }
            }
        };
        self.state = VaultState::Loaded(ActiveVault {
            blob_key,
            provider,
            records,
        });

        // Persist the freshly seeded (or empty) collection so the next
        // load is no longer a first run.
        if first_run {
            self.persist()?;
        }
        Ok(())
    }

    /// Discard all vault state for the session, in memory and on disk.
    ///
    /// Idempotent; after this only a new `load` is valid.
    pub fn clear(&mut self) -> Result<()> {
        if let VaultState::Loaded(active) = &mut self.state {
            active.records.clear();
            let blob_key = active.blob_key.clone();
            self.state = VaultState::Cleared;
            self.storage.delete_blob(&blob_key)?;
        } else {
            self.state = VaultState::Cleared;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Add a new credential.
    ///
    /// Validates the draft, encrypts the secret, assigns a fresh id,
    /// appends, persists, and returns the record — with the secret
    /// still in its encrypted form.  Viewing the plaintext requires an
    /// explicit `decrypt_secret` call.
    pub fn add(&mut self, mut draft: RecordDraft) -> Result<CredentialRecord> {
        let active = self.active_mut()?;

        // Wipe the plaintext secret on every validation exit.
        let name = non_blank("name", &draft.name);
        let username = non_blank("username", &draft.username);
        if draft.secret.trim().is_empty() {
            draft.secret.zeroize();
            return Err(SecureVaultError::Validation(
                "secret must not be empty".into(),
            ));
        }
        let (name, username) = match (name, username) {
            (Ok(name), Ok(username)) => (name, username),
            (Err(e), _) | (_, Err(e)) => {
                draft.secret.zeroize();
                return Err(e);
            }
        };

        let id = random_id("entry")?;
        let ciphertext = active.provider.encrypt(draft.secret.as_bytes(), &id);
        draft.secret.zeroize();
        let encrypted_secret = ciphertext?;

        let now = Utc::now();
        let record = CredentialRecord {
            id,
            name,
            username,
            encrypted_secret,
            url: draft.url,
            notes: draft.notes,
            category: draft.category,
            created_at: now,
            updated_at: now,
        };

        active.records.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Apply a partial update to the record with `id`.
    ///
    /// Present patch fields overwrite the stored value; a patched
    /// secret is freshly encrypted, an absent one leaves the stored
    /// ciphertext untouched.  `updated_at` is always refreshed.
    ///
    /// The update is all-or-nothing: the stored record is replaced only
    /// after every patch field has validated, so a rejected patch
    /// leaves both the in-memory record and the durable snapshot
    /// exactly as they were.
    pub fn update(&mut self, id: &str, mut patch: RecordPatch) -> Result<CredentialRecord> {
        let active = self.active_mut()?;

        let index = active
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SecureVaultError::RecordNotFound(id.to_string()))?;

        // Validate everything up front, wiping the plaintext secret on
        // every validation exit.
        let name = patch.name.as_deref().map(|n| non_blank("name", n)).transpose();
        let username = patch
            .username
            .as_deref()
            .map(|u| non_blank("username", u))
            .transpose();
        if patch.secret.as_deref().is_some_and(|s| s.trim().is_empty()) {
            if let Some(secret) = &mut patch.secret {
                secret.zeroize();
            }
            return Err(SecureVaultError::Validation(
                "secret must not be empty".into(),
            ));
        }
        let (name, username) = match (name, username) {
            (Ok(name), Ok(username)) => (name, username),
            (Err(e), _) | (_, Err(e)) => {
                if let Some(secret) = &mut patch.secret {
                    secret.zeroize();
                }
                return Err(e);
            }
        };

        // Stage the patch on a copy and swap it in as one assignment.
        let mut updated = active.records[index].clone();
        if let Some(name) = name {
            updated.name = name;
        }
        if let Some(username) = username {
            updated.username = username;
        }
        if let Some(secret) = &mut patch.secret {
            let ciphertext = active.provider.encrypt(secret.as_bytes(), id);
            secret.zeroize();
            updated.encrypted_secret = ciphertext?;
        }
        if let Some(url) = patch.url {
            updated.url = Some(url);
        }
        if let Some(notes) = patch.notes {
            updated.notes = Some(notes);
        }
        if let Some(category) = patch.category {
            updated.category = Some(category);
        }
        updated.updated_at = Utc::now();

        active.records[index] = updated.clone();
        self.persist()?;
        Ok(updated)
    }

    /// Remove the record with `id`.
    ///
    /// Deletion is idempotent: an absent id is a no-op, not an error,
    /// and nothing is re-persisted.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let active = self.active_mut()?;

        let Some(index) = active.records.iter().position(|r| r.id == id) else {
            return Ok(());
        };
        active.records.remove(index);
        self.persist()
    }

    /// Case-insensitive substring search over the plaintext metadata
    /// fields (name, username, url, category, notes).
    ///
    /// A blank or whitespace-only query returns the full collection;
    /// any other query is matched as-is, surrounding whitespace
    /// included.  The encrypted secret is outside the search scope and
    /// is never decrypted here.
    pub fn search(&self, query: &str) -> Result<Vec<CredentialRecord>> {
        let active = self.active()?;

        if query.trim().is_empty() {
            return Ok(active.records.clone());
        }
        let query = query.to_lowercase();

        let matches = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&query))
        };

        Ok(active
            .records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&query)
                    || r.username.to_lowercase().contains(&query)
                    || matches(&r.url)
                    || matches(&r.category)
                    || matches(&r.notes)
            })
            .cloned()
            .collect())
    }

    /// Decrypt and return the plaintext secret of `record`.
    ///
    /// This is the only place plaintext is reconstituted.  The result
    /// is wiped on drop; callers must treat it as transient and never
    /// persist it.
    pub fn decrypt_secret(&self, record: &CredentialRecord) -> Result<Zeroizing<String>> {
        let active = self.active()?;

        let plaintext_bytes = active.provider.decrypt(&record.encrypted_secret, &record.id)?;

        // On error, zeroize the bytes inside the error before discarding.
        String::from_utf8(plaintext_bytes)
            .map(Zeroizing::new)
            .map_err(|e| {
                let mut bad_bytes = e.into_bytes();
                bad_bytes.zeroize();
                SecureVaultError::UnreadableSecret
            })
    }

    /// All records in insertion order.
    pub fn records(&self) -> Result<&[CredentialRecord]> {
        Ok(&self.active()?.records)
    }

    /// Returns the number of records in the loaded vault.
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.active()?.records.len())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the loaded vault for external export.
    ///
    /// Same bytes as the durable snapshot: human-inspectable JSON with
    /// every secret in encrypted form.  No file I/O happens here.
    pub fn serialize_snapshot(&self) -> Result<Vec<u8>> {
        let active = self.active()?;
        let mut integrity_key = active.provider.integrity_key()?;
        let bytes = snapshot::encode_snapshot(&active.records, &integrity_key);
        integrity_key.zeroize();
        bytes
    }

    /// Write the current collection to durable storage.
    fn persist(&mut self) -> Result<()> {
        let bytes = self.serialize_snapshot()?;
        let active = self.active()?;
        self.storage.write_blob(&active.blob_key, &bytes)
    }

    // ------------------------------------------------------------------
    // State gating
    // ------------------------------------------------------------------

    fn active(&self) -> Result<&ActiveVault> {
        match &self.state {
            VaultState::Loaded(active) => Ok(active),
            _ => Err(SecureVaultError::NoActiveSession),
        }
    }

    fn active_mut(&mut self) -> Result<&mut ActiveVault> {
        match &mut self.state {
            VaultState::Loaded(active) => Ok(active),
            _ => Err(SecureVaultError::NoActiveSession),
        }
    }
}

/// Validate that a required field is non-blank; returns it trimmed.
fn non_blank(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SecureVaultError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Build the first-run example records.
///
/// Gives a brand-new vault something to show instead of an empty
/// screen.  Only runs when no snapshot exists; an existing vault is
/// never touched.
fn seed_records(provider: &CryptoProvider) -> Result<Vec<CredentialRecord>> {
    let samples = [
        (
            "Google",
            "user@example.com",
            "demoPassword123",
            "https://google.com",
            "Social",
        ),
        (
            "GitHub",
            "developer",
            "securePass!456",
            "https://github.com",
            "Development",
        ),
    ];

    let now = Utc::now();
    samples
        .iter()
        .map(|(name, username, secret, url, category)| {
            let id = random_id("entry")?;
            let encrypted_secret = provider.encrypt(secret.as_bytes(), &id)?;
            Ok(CredentialRecord {
                id,
                name: (*name).to_string(),
                username: (*username).to_string(),
                encrypted_secret,
                url: Some((*url).to_string()),
                notes: None,
                category: Some((*category).to_string()),
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}
