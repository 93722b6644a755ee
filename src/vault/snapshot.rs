//! Vault snapshot format and HMAC integrity verification.
//!
//! A snapshot is the durable (and exportable) representation of one
//! session's vault.  It is deliberately human-inspectable JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2026-08-29T12:00:00Z",
//!   "records": [ ... secrets as base64 ciphertext ... ],
//!   "integrity": "<base64 HMAC-SHA256 over the records JSON>"
//! }
//! ```
//!
//! Secrets appear only in encrypted form; the `integrity` tag is keyed
//! by an HKDF-derived sub-key of the session's vault key, so a foreign
//! or edited snapshot is rejected before any ciphertext is trusted.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::record::CredentialRecord;
use crate::errors::{Result, SecureVaultError};

/// Current snapshot format version.
pub const CURRENT_VERSION: u8 = 1;

/// The serialized form of a vault.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u8,

    /// When this snapshot was written.
    pub saved_at: DateTime<Utc>,

    /// The records, insertion order preserved, secrets encrypted.
    pub records: Vec<CredentialRecord>,

    /// Base64 HMAC-SHA256 tag over the serialized `records` array.
    pub integrity: String,
}

/// Serialize `records` into snapshot bytes (pretty JSON).
///
/// The integrity tag is computed over the compact JSON encoding of the
/// records array, which `decode_snapshot` re-derives for verification.
pub fn encode_snapshot(records: &[CredentialRecord], integrity_key: &[u8]) -> Result<Vec<u8>> {
    let records_bytes = serde_json::to_vec(records)
        .map_err(|e| SecureVaultError::SerializationError(format!("records: {e}")))?;
    let tag = compute_tag(integrity_key, &records_bytes)?;

    let snapshot = Snapshot {
        version: CURRENT_VERSION,
        saved_at: Utc::now(),
        records: records.to_vec(),
        integrity: BASE64.encode(tag),
    };

    serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| SecureVaultError::SerializationError(format!("snapshot: {e}")))
}

/// Parse snapshot bytes and verify the integrity tag.
///
/// Returns the records in their stored order.
pub fn decode_snapshot(bytes: &[u8], integrity_key: &[u8]) -> Result<Vec<CredentialRecord>> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)
        .map_err(|e| SecureVaultError::InvalidSnapshot(format!("snapshot JSON: {e}")))?;

    if snapshot.version != CURRENT_VERSION {
        return Err(SecureVaultError::InvalidSnapshot(format!(
            "unsupported version {}, expected {CURRENT_VERSION}",
            snapshot.version
        )));
    }

    let expected = BASE64
        .decode(&snapshot.integrity)
        .map_err(|e| SecureVaultError::InvalidSnapshot(format!("integrity tag: {e}")))?;

    // Re-derive the compact records encoding and verify the tag over
    // it.  Record serialization is deterministic (fixed field order,
    // absent optionals omitted on both sides), so a clean round-trip
    // reproduces the exact bytes that were tagged.
    let records_bytes = serde_json::to_vec(&snapshot.records)
        .map_err(|e| SecureVaultError::SerializationError(format!("records: {e}")))?;
    verify_tag(integrity_key, &records_bytes, &expected)?;

    Ok(snapshot.records)
}

/// Compute HMAC-SHA256 over the records bytes.
fn compute_tag(integrity_key: &[u8], records_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(integrity_key)
        .map_err(|e| SecureVaultError::IntegrityKeyError(format!("invalid HMAC key: {e}")))?;
    mac.update(records_bytes);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify the HMAC tag using constant-time comparison.
///
/// Uses `hmac::Mac::verify_slice` which is guaranteed constant-time.
fn verify_tag(integrity_key: &[u8], records_bytes: &[u8], expected: &[u8]) -> Result<()> {
    let mut mac = Hmac::<Sha256>::new_from_slice(integrity_key)
        .map_err(|e| SecureVaultError::IntegrityKeyError(format!("invalid HMAC key: {e}")))?;
    mac.update(records_bytes);
    mac.verify_slice(expected)
        .map_err(|_| SecureVaultError::IntegrityMismatch)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

// ── Tests ────────────────────────────────────────────────────────────
