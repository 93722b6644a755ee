//! `securevault add` — add a credential to the vault.

use std::io::{self, IsTerminal, Read};

use crate::cli::{build_core, output, prompt_secret, require_session, Cli};
use crate::errors::Result;
use crate::vault::RecordDraft;

/// Options gathered from the command line for a new credential.
pub struct AddArgs<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub secret: Option<&'a str>,
    pub url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub category: Option<&'a str>,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: &AddArgs<'_>) -> Result<()> {
    // Determine the secret value from one of three sources.
    let secret = if let Some(v) = args.secret {
        // Source 1: Inline value on the command line.
        output::warning("Secret provided on command line — it may appear in shell history.");
        v.to_string()
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        // Source 3: Interactive secure prompt (default).
        prompt_secret(&format!("Enter secret for '{}'", args.name))?.to_string()
    };

    let (mut sessions, mut vault) = build_core(cli)?;
    let session = require_session(&mut sessions)?;
    vault.load(&session)?;

    let record = vault.add(RecordDraft {
        name: args.name.to_string(),
        username: args.username.to_string(),
        secret,
        url: args.url.map(str::to_string),
        notes: args.notes.map(str::to_string),
        category: args.category.map(str::to_string),
    })?;

    output::success(&format!(
        "Added '{}' to the vault ({} total)",
        record.name,
        vault.record_count()?
    ));
    output::tip(&format!("Reveal it later: securevault show {} --reveal", record.id));

    Ok(())
}
