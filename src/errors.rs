use thiserror::Error;

/// All errors that can occur in SecureVault.
#[derive(Debug, Error)]
pub enum SecureVaultError {
    // --- Auth errors ---
    #[error("Invalid credentials — identifier and proof must not be empty")]
    InvalidCredential,

    // --- Session / state errors ---
    #[error("No active session — log in before touching the vault")]
    NoActiveSession,

    // --- Vault errors ---
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Credential '{0}' not found")]
    RecordNotFound(String),

    #[error("Invalid snapshot format: {0}")]
    InvalidSnapshot(String),

    #[error("Snapshot integrity check failed — vault data may be tampered")]
    IntegrityMismatch,

    // --- Crypto errors ---
    #[error("Secret is unreadable — corrupted or foreign ciphertext")]
    UnreadableSecret,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("OS entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Integrity key error: {0}")]
    IntegrityKeyError(String),

    // --- Persistence errors ---
    #[error("Persistence error: {0}")]
    Persistence(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for SecureVault results.
pub type Result<T> = std::result::Result<T, SecureVaultError>;
