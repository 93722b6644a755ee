//! Vault module — the per-session encrypted credential collection.
//!
//! This module provides:
//! - `CredentialRecord` plus its draft/patch types (`record`)
//! - The versioned JSON snapshot format with HMAC integrity
//!   (`snapshot`)
//! - The session-gated `VaultStore` for loading, mutating, searching,
//!   and persisting records (`store`)

pub mod record;
pub mod snapshot;
pub mod store;

// Re-export the most commonly used items.
pub use record::{CredentialRecord, RecordDraft, RecordPatch};
pub use snapshot::Snapshot;
pub use store::VaultStore;
