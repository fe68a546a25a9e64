//! `stegpass audit` — show the operation log for a vault.

use comfy_table::{ContentArrangement, Table};

use crate::audit::AuditLog;
use crate::cli::output;
use crate::cli::{vault_path, Cli};
use crate::errors::Result;

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize) -> Result<()> {
    let path = vault_path(cli)?;

    let Some(audit) = AuditLog::open(&path) else {
        output::info("No audit log available for this vault.");
        return Ok(());
    };

    let entries = audit.query(last)?;
    if entries.is_empty() {
        output::info("Audit log is empty.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Vault", "URI", "Details"]);

    for entry in &entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.operation.clone(),
            entry.vault.clone(),
            entry.uri.clone().unwrap_or_default(),
            entry.details.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");

    Ok(())
}
