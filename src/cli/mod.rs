//! CLI module — Clap argument parser, output helpers, and command
//! implementations.
//!
//! The CLI is the presentation collaborator: it restores the session,
//! loads the vault, and calls into the core contract.  No secret ever
//! reaches this layer except through an explicit `decrypt_secret`.

pub mod commands;
pub mod output;

use std::sync::Arc;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, SecureVaultError};
use crate::session::{Session, SessionManager};
use crate::storage::{FileStorage, PersistenceAdapter};
use crate::vault::VaultStore;

/// SecureVault CLI: session-gated encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "securevault",
    about = "Session-gated encrypted credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: .securevault, or data_dir from .securevault.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Log in and establish a session
    Login {
        /// Email or login identifier
        email: String,

        /// Credential proof (omit for interactive prompt)
        #[arg(long, env = "SECUREVAULT_PROOF", hide_env_values = true)]
        proof: Option<String>,
    },

    /// End the session and wipe all vault state
    Logout,

    /// Show the active session and vault summary
    Status,

    /// Add a credential to the vault
    Add {
        /// Credential name (e.g. "GitHub")
        name: String,

        /// Login name or email for the credential
        #[arg(short, long)]
        username: String,

        /// Secret value (omit for interactive prompt)
        #[arg(long)]
        secret: Option<String>,

        /// Site or service URL
        #[arg(long)]
        url: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Category tag (e.g. "Work")
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List credentials, optionally filtered by a search query
    List {
        /// Case-insensitive substring to match against metadata
        query: Option<String>,
    },

    /// Show one credential's details
    Show {
        /// Credential id (see `list`)
        id: String,

        /// Decrypt and print the secret as well
        #[arg(long)]
        reveal: bool,
    },

    /// Update fields of an existing credential
    Update {
        /// Credential id (see `list`)
        id: String,

        /// New credential name
        #[arg(long)]
        name: Option<String>,

        /// New login name or email
        #[arg(long)]
        username: Option<String>,

        /// New secret value (prefer --rotate-secret for a hidden prompt)
        #[arg(long)]
        secret: Option<String>,

        /// Prompt interactively for a new secret value
        #[arg(long, conflicts_with = "secret")]
        rotate_secret: bool,

        /// New site or service URL
        #[arg(long)]
        url: Option<String>,

        /// New free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// New category tag
        #[arg(long)]
        category: Option<String>,
    },

    /// Remove a credential (no-op when the id is already gone)
    Remove {
        /// Credential id (see `list`)
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Export the vault snapshot (secrets stay encrypted)
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Build the session manager and vault store over file storage.
///
/// Settings come from `.securevault.toml` in the working directory;
/// `--data-dir` overrides the configured location.
pub fn build_core(cli: &Cli) -> Result<(SessionManager, VaultStore)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    let data_path = match &cli.data_dir {
        Some(dir) => cwd.join(dir),
        None => settings.data_path(&cwd),
    };

    let storage: Arc<dyn PersistenceAdapter> = Arc::new(FileStorage::new(data_path));
    let sessions = SessionManager::new(Arc::clone(&storage));
    let vault = VaultStore::new(storage, settings.kdf_params(), settings.seed_sample_records);
    Ok((sessions, vault))
}

/// Restore the persisted session or fail with `NoActiveSession`.
pub fn require_session(sessions: &mut SessionManager) -> Result<Session> {
    sessions
        .restore_session()?
        .ok_or(SecureVaultError::NoActiveSession)
}

/// Prompt for the credential proof with a hidden input.
///
/// Returns `Zeroizing<String>` so the proof is wiped from memory on
/// drop.  (Non-interactive callers pass `--proof` or the
/// `SECUREVAULT_PROOF` env var instead.)
pub fn prompt_proof() -> Result<Zeroizing<String>> {
    let proof = dialoguer::Password::new()
        .with_prompt("Enter your credential proof")
        .interact()
        .map_err(|e| SecureVaultError::CommandFailed(format!("proof prompt: {e}")))?;
    Ok(Zeroizing::new(proof))
}

/// Prompt for a secret value with a hidden input.
pub fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>> {
    let secret = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| SecureVaultError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}
