//! Vault key derivation using Argon2id.
//!
//! The vault key is derived from the active session's identity plus a
//! per-session random salt.  Argon2id is memory-hard, so even though
//! the input material is low-entropy the derivation cost is real.
//! Parameters are configurable via `KdfParams` (loaded from
//! `.securevault.toml` or sensible defaults).

use argon2::{Algorithm, Argon2, Params, Version};
use rand::TryRngCore;

use crate::errors::{Result, SecureVaultError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
const KEY_LEN: usize = 32;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings` so the CLI can pass
/// whatever the user configured in `.securevault.toml`.
#[derive(Debug, Clone, Copy)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Derive a 32-byte vault key from session identity material and salt.
///
/// The same material + salt + params will always produce the same key.
/// Enforces minimum Argon2 parameters to prevent dangerously weak KDF
/// settings.
pub fn derive_vault_key(material: &[u8], salt: &[u8], kdf_params: &KdfParams) -> Result<[u8; KEY_LEN]> {
    if kdf_params.memory_kib < MIN_MEMORY_KIB {
        return Err(SecureVaultError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            kdf_params.memory_kib
        )));
    }
    if kdf_params.iterations < 1 {
        return Err(SecureVaultError::KeyDerivationFailed(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if kdf_params.parallelism < 1 {
        return Err(SecureVaultError::KeyDerivationFailed(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| SecureVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(material, salt, &mut key)
        .map_err(|e| {
            SecureVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
        })?;

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
///
/// Fails only when the OS entropy source is unavailable.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| SecureVaultError::EntropyUnavailable(e.to_string()))?;
    Ok(salt)
}
