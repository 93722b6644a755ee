//! `securevault logout` — end the session and wipe vault state.

use crate::cli::{build_core, output, Cli};
use crate::errors::Result;

/// Execute the `logout` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (mut sessions, mut vault) = build_core(cli)?;

    if sessions.restore_session()?.is_none() {
        output::info("No active session.");
        return Ok(());
    }

    sessions.end_session(&mut vault)?;
    output::success("Logged out — session and vault state cleared.");

    Ok(())
}
