//! Key derivation helpers using HKDF-SHA256.
//!
//! From a single vault key we derive:
//! - A unique **per-record** encryption key for each credential id.
//! - A dedicated **integrity key** for snapshot tamper checks.
//!
//! HKDF (RFC 5869) uses the vault key as input keying material (IKM)
//! and a context string (`info`) to produce independent sub-keys.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, SecureVaultError};

/// Length of derived sub-keys (256 bits).
const KEY_LEN: usize = 32;

/// Derive a per-record encryption key from the vault key.
///
/// Each record id produces a different key so that compromising one
/// encrypted secret does not reveal others.
///
/// `info` is set to `"securevault-record:<record_id>"` to bind the
/// derived key to a specific credential.
pub fn derive_record_key(vault_key: &[u8], record_id: &str) -> Result<[u8; KEY_LEN]> {
    let info = format!("securevault-record:{record_id}");
    hkdf_derive(vault_key, info.as_bytes())
}

/// Derive an integrity key from the vault key.
///
/// This key is used to compute an HMAC over the vault snapshot so
/// tampering is detected before any ciphertext is trusted.
pub fn derive_integrity_key(vault_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(vault_key, b"securevault-integrity-key")
}

/// Internal helper: run HKDF-SHA256 with the given `info`.
///
/// `salt` is `None`, so extract runs with a zero-filled salt.  The
/// vault key is already uniform (it came from Argon2id), so the salt
/// adds nothing here.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| SecureVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A wrapper around the 32-byte vault key that automatically zeroes
/// its memory when dropped.
///
/// Use this to hold the vault key in memory so it cannot linger after
/// the session it belongs to has ended.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a new `VaultKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to HKDF).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive a per-record encryption key from this vault key.
    pub fn derive_record_key(&self, record_id: &str) -> Result<[u8; KEY_LEN]> {
        derive_record_key(&self.bytes, record_id)
    }

    /// Derive an integrity key from this vault key.
    pub fn derive_integrity_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_integrity_key(&self.bytes)
    }
}
