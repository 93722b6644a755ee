//! Cryptographic primitives for SecureVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id key derivation for the per-session vault key (`kdf`)
//! - HKDF-based per-record and integrity key derivation (`keys`)
//! - The session-keyed `CryptoProvider` the vault layer talks to
//!   (`provider`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod provider;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, CryptoProvider, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_vault_key, generate_salt, KdfParams};
pub use keys::{derive_integrity_key, derive_record_key, VaultKey};
pub use provider::CryptoProvider;
