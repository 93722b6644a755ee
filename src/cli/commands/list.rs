//! `securevault list` — display credentials in a table.

use crate::cli::{build_core, output, require_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, query: Option<&str>) -> Result<()> {
    let (mut sessions, mut vault) = build_core(cli)?;
    let session = require_session(&mut sessions)?;
    vault.load(&session)?;

    let records = vault.search(query.unwrap_or(""))?;

    match query {
        Some(q) => output::info(&format!("{} match(es) for '{q}'", records.len())),
        None => output::info(&format!(
            "{}'s vault — {} credential(s)",
            session.display_name,
            records.len()
        )),
    }

    output::print_records_table(&records);

    Ok(())
}
