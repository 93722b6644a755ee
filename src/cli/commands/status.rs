//! `securevault status` — show the active session and vault summary.

use crate::cli::{build_core, output, Cli};
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (mut sessions, mut vault) = build_core(cli)?;

    let session = match sessions.restore_session()? {
        Some(s) => s,
        None => {
            output::info("No active session.");
            output::tip("Run `securevault login <email>` to start one.");
            return Ok(());
        }
    };

    vault.load(&session)?;

    output::info(&format!(
        "Logged in as {} <{}> since {}",
        session.display_name,
        session.email,
        session.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    output::info(&format!("{} credential(s) in the vault", vault.record_count()?));

    Ok(())
}
