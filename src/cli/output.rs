//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::CredentialRecord;

/// Placeholder shown when a stored ciphertext cannot be decrypted.
pub const UNREADABLE_PLACEHOLDER: &str = "<unreadable>";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of credential metadata.  Secrets never appear here.
pub fn print_records_table(records: &[CredentialRecord]) {
    if records.is_empty() {
        info("No credentials in this vault yet.");
        tip("Run `securevault add <name> --username <user>` to add your first one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Username", "URL", "Category", "Updated"]);

    for r in records {
        table.add_row(vec![
            r.id.clone(),
            r.name.clone(),
            r.username.clone(),
            r.url.clone().unwrap_or_default(),
            r.category.clone().unwrap_or_default(),
            r.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}
