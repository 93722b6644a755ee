//! `securevault update` — apply a partial update to a credential.

use crate::cli::{build_core, output, prompt_secret, require_session, Cli};
use crate::errors::{Result, SecureVaultError};
use crate::vault::RecordPatch;

/// Options gathered from the command line for an update.
#[derive(Default)]
pub struct UpdateArgs {
    pub name: Option<String>,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub rotate_secret: bool,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Execute the `update` command.
pub fn execute(cli: &Cli, id: &str, mut args: UpdateArgs) -> Result<()> {
    if args.secret.is_some() {
        output::warning("Secret provided on command line — it may appear in shell history.");
    } else if args.rotate_secret {
        args.secret = Some(prompt_secret("Enter the new secret")?.to_string());
    }

    let patch = RecordPatch {
        name: args.name,
        username: args.username,
        secret: args.secret,
        url: args.url,
        notes: args.notes,
        category: args.category,
    };

    if patch.name.is_none()
        && patch.username.is_none()
        && patch.secret.is_none()
        && patch.url.is_none()
        && patch.notes.is_none()
        && patch.category.is_none()
    {
        return Err(SecureVaultError::CommandFailed(
            "nothing to update — pass at least one field flag".into(),
        ));
    }

    let (mut sessions, mut vault) = build_core(cli)?;
    let session = require_session(&mut sessions)?;
    vault.load(&session)?;

    let record = vault.update(id, patch)?;
    output::success(&format!("Updated '{}'", record.name));

    Ok(())
}
