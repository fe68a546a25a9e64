//! `stegpass rem` — remove a login from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{log_operation, prompt_master_secret, vault_path, Cli};
use crate::errors::{Result, StegPassError};
use crate::vault::VaultStore;

/// Execute the `rem` command.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    let path = vault_path(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete login {id}? This cannot be undone."))
            .default(false)
            .interact()
            .map_err(|e| StegPassError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let master_secret = prompt_master_secret()?;
    let mut store = VaultStore::open(&path, &master_secret)?;

    store.delete(id)?;

    log_operation(&path, "rem", None, Some("login deleted"));
    output::success(&format!(
        "Deleted login {id} ({} remaining)",
        store.login_count()
    ));

    Ok(())
}
