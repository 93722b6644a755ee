//! `securevault login` — authenticate and establish a session.

use zeroize::Zeroizing;

use crate::cli::{build_core, output, prompt_proof, Cli};
use crate::errors::Result;

/// Execute the `login` command.
pub fn execute(cli: &Cli, email: &str, proof: Option<&str>) -> Result<()> {
    let (mut sessions, mut vault) = build_core(cli)?;

    // A lingering session from a previous login is torn down first so
    // its vault state does not outlive it.
    if sessions.restore_session()?.is_some() {
        output::info("Ending the previous session.");
        sessions.end_session(&mut vault)?;
    }

    let proof = match proof {
        Some(p) => Zeroizing::new(p.to_string()),
        None => prompt_proof()?,
    };

    let session = sessions.authenticate(email, &proof)?;
    vault.load(&session)?;

    output::success(&format!(
        "Logged in as {} ({} credential(s) in the vault)",
        session.display_name,
        vault.record_count()?
    ));
    output::tip("Run `securevault list` to see your credentials.");

    Ok(())
}
