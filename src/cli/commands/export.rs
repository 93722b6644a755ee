//! `securevault export` — write the vault snapshot for inspection.
//!
//! The export is byte-identical to the durable snapshot: pretty JSON
//! with every secret still in encrypted form.  Decrypting is never
//! part of export.

use std::fs;
use std::path::Path;

use crate::cli::{build_core, output, require_session, Cli};
use crate::errors::{Result, SecureVaultError};

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let (mut sessions, mut vault) = build_core(cli)?;
    let session = require_session(&mut sessions)?;
    vault.load(&session)?;

    let bytes = vault.serialize_snapshot()?;

    match output_path {
        Some(dest) => {
            // Safety: refuse to overwrite storage blobs.
            if Path::new(dest)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("blob"))
            {
                return Err(SecureVaultError::CommandFailed(
                    "refusing to export over a .blob storage file".into(),
                ));
            }

            fs::write(dest, &bytes).map_err(|e| {
                SecureVaultError::CommandFailed(format!("failed to write export file: {e}"))
            })?;

            output::success(&format!(
                "Exported {} credential(s) to {dest} (secrets encrypted)",
                vault.record_count()?
            ));
        }
        None => {
            // Write to stdout (no success message, just raw output).
            let text = String::from_utf8_lossy(&bytes);
            print!("{text}");
        }
    }

    Ok(())
}
