//! Credential record types stored inside a vault.
//!
//! Each record holds its descriptive metadata in plaintext and the
//! secret exclusively as ciphertext.  The `encrypted_secret` field
//! uses custom serde helpers so it serializes as a base64 string in
//! JSON rather than a raw byte array.

use chrono::{DateTime, Utc};
use rand::TryRngCore;
use serde::{Deserialize, Serialize};

use super::snapshot::{base64_decode, base64_encode};
use crate::errors::{Result, SecureVaultError};

/// One stored secret plus its descriptive metadata.
///
/// The secret never appears here in plaintext: `encrypted_secret` is
/// the AEAD output (nonce + ciphertext) and is the only form that is
/// ever serialized.  Use `VaultStore::decrypt_secret` to reconstitute
/// the plaintext transiently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Unique id within the vault, assigned at creation, immutable.
    pub id: String,

    /// Human-readable name of the credential (e.g. "GitHub").
    pub name: String,

    /// Login name or email the credential belongs to.
    pub username: String,

    /// The encrypted secret bytes (nonce + ciphertext).
    /// Serialized as a base64 string in JSON.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub encrypted_secret: Vec<u8>,

    /// Optional site or service URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Optional free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Optional category tag (e.g. "Work").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// When this record was created.  Immutable.
    pub created_at: DateTime<Utc>,

    /// When this record was last mutated.
    pub updated_at: DateTime<Utc>,
}

/// Input for `VaultStore::add` — everything the caller supplies for a
/// new record.  `secret` is plaintext and is wiped after encryption.
#[derive(Debug, Default)]
pub struct RecordDraft {
    pub name: String,
    pub username: String,
    pub secret: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Partial update for `VaultStore::update`.
///
/// Fields left as `None` keep their stored value; a present `secret`
/// is freshly encrypted, otherwise the stored ciphertext is preserved
/// byte-for-byte.
#[derive(Debug, Default)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Character set for generated id suffixes (lowercase base36).
const ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random id suffix.
const ID_SUFFIX_LEN: usize = 9;

/// Generate a random id of the form `<prefix>_<9 base36 chars>`.
///
/// Fails only when the OS entropy source is unavailable.
pub(crate) fn random_id(prefix: &str) -> Result<String> {
    let mut bytes = [0u8; ID_SUFFIX_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SecureVaultError::EntropyUnavailable(e.to_string()))?;

    let suffix: String = bytes
        .iter()
        .map(|b| ID_CHARSET[(*b as usize) % ID_CHARSET.len()] as char)
        .collect();
    Ok(format!("{prefix}_{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_carry_prefix_and_length() {
        let id = random_id("entry").unwrap();
        assert!(id.starts_with("entry_"));
        assert_eq!(id.len(), "entry_".len() + ID_SUFFIX_LEN);
    }

    #[test]
    fn random_ids_are_distinct() {
        let a = random_id("entry").unwrap();
        let b = random_id("entry").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn record_json_omits_absent_optionals() {
        let record = CredentialRecord {
            id: "entry_abc".into(),
            name: "Mail".into(),
            username: "a@b.com".into(),
            encrypted_secret: vec![1, 2, 3],
            url: None,
            notes: None,
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"url\""));
        assert!(!json.contains("\"notes\""));
        // Ciphertext is base64, not a byte array.
        assert!(json.contains("\"encrypted_secret\":\"AQID\""));
    }
}
