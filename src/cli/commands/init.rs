//! `stegpass init` — create a new vault.

use crate::cli::output;
use crate::cli::{log_operation, prompt_new_master_secret, vault_path, Cli};
use crate::config::Settings;
use crate::errors::{Result, StegPassError};
use crate::vault::VaultStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = vault_path(cli)?;

    if path.exists() {
        output::tip("Use `stegpass add` to store logins in the existing vault.");
        return Err(StegPassError::VaultAlreadyExists(path));
    }

    // Prompt before doing any work so a cancelled prompt leaves no file.
    let master_secret = prompt_new_master_secret()?;

    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    VaultStore::create(&path, &master_secret, Some(&settings.argon2_params()))?;

    output::success(&format!("Vault created at {}", path.display()));

    log_operation(&path, "init", None, Some("vault created"));

    output::tip("Run `stegpass add <uri> <username>` to store a login.");
    output::tip("Run `stegpass hide <cover.png>` to conceal the vault in an image.");

    Ok(())
}
