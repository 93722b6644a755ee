//! `securevault remove` — delete a credential from the vault.
//!
//! Removal is idempotent: an id that is already gone is a quiet
//! no-op, so retrying a remove never fails.

use dialoguer::Confirm;

use crate::cli::{build_core, output, require_session, Cli};
use crate::errors::{Result, SecureVaultError};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    // Session first: a logged-out user gets the session error, not a
    // confirmation prompt for a deletion that cannot happen.
    let (mut sessions, mut vault) = build_core(cli)?;
    let session = require_session(&mut sessions)?;
    vault.load(&session)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove credential '{id}'?"))
            .default(false)
            .interact()
            .map_err(|e| SecureVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.remove(id)?;
    output::success(&format!("Removed '{id}' (if it existed)"));

    Ok(())
}
