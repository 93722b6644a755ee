//! `securevault show` — display one credential's details.
//!
//! The secret is printed only with `--reveal`, and ciphertext that
//! cannot be decrypted degrades to a placeholder instead of failing
//! the whole command.

use crate::cli::{build_core, output, require_session, Cli};
use crate::errors::{Result, SecureVaultError};

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: &str, reveal: bool) -> Result<()> {
    let (mut sessions, mut vault) = build_core(cli)?;
    let session = require_session(&mut sessions)?;
    vault.load(&session)?;

    let record = vault
        .records()?
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or_else(|| SecureVaultError::RecordNotFound(id.to_string()))?;

    println!("Id:        {}", record.id);
    println!("Name:      {}", record.name);
    println!("Username:  {}", record.username);
    if let Some(url) = &record.url {
        println!("URL:       {url}");
    }
    if let Some(category) = &record.category {
        println!("Category:  {category}");
    }
    if let Some(notes) = &record.notes {
        println!("Notes:     {notes}");
    }
    println!("Created:   {}", record.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Updated:   {}", record.updated_at.format("%Y-%m-%d %H:%M:%S"));

    if reveal {
        match vault.decrypt_secret(&record) {
            Ok(secret) => println!("Secret:    {}", secret.as_str()),
            Err(SecureVaultError::UnreadableSecret) => {
                println!("Secret:    {}", output::UNREADABLE_PLACEHOLDER);
                output::warning("Stored ciphertext could not be decrypted.");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
