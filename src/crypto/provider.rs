//! Session-keyed encryption provider.
//!
//! `CryptoProvider` is the only thing the vault layer talks to when a
//! secret crosses the memory boundary.  It is a pure transformation
//! pair: `encrypt` and `decrypt` take a context string (the record id)
//! and hold no mutable state, so a shared reference can be used from
//! any thread.
//!
//! The provider is keyed by session-derived material: Argon2id over
//! the session's user id with the session's random salt, then HKDF
//! sub-keys per record.  Ending the session drops the provider and
//! zeroizes the vault key with it.

use zeroize::Zeroize;

use crate::crypto::{encryption, kdf, keys};
use crate::errors::Result;
use crate::session::Session;

/// Encryption/decryption front-end bound to one session's key material.
pub struct CryptoProvider {
    key: keys::VaultKey,
}

impl CryptoProvider {
    /// Derive the vault key for `session` and build a provider around it.
    pub fn for_session(session: &Session, params: &kdf::KdfParams) -> Result<Self> {
        let mut key_bytes =
            kdf::derive_vault_key(session.user_id.as_bytes(), &session.kdf_salt, params)?;
        let key = keys::VaultKey::new(key_bytes);
        key_bytes.zeroize();
        Ok(Self { key })
    }

    /// Build a provider directly from a vault key (used by tests).
    pub fn from_key(key: keys::VaultKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` under a per-`context` sub-key.
    ///
    /// The sub-key is zeroized immediately after use.
    pub fn encrypt(&self, plaintext: &[u8], context: &str) -> Result<Vec<u8>> {
        let mut record_key = self.key.derive_record_key(context)?;
        let ciphertext = encryption::encrypt(&record_key, plaintext);
        record_key.zeroize();
        ciphertext
    }

    /// Decrypt bytes produced by `encrypt` under the same `context`.
    ///
    /// Fails with `UnreadableSecret` for anything that is not our own
    /// ciphertext; the caller recovers by showing a placeholder.
    pub fn decrypt(&self, ciphertext: &[u8], context: &str) -> Result<Vec<u8>> {
        let mut record_key = self.key.derive_record_key(context)?;
        let plaintext = encryption::decrypt(&record_key, ciphertext);
        record_key.zeroize();
        plaintext
    }

    /// Derive the snapshot integrity key.
    ///
    /// The caller is responsible for zeroizing the returned bytes once
    /// the HMAC has been computed or verified.
    pub fn integrity_key(&self) -> Result<[u8; 32]> {
        self.key.derive_integrity_key()
    }
}
