//! `stegpass edit` — replace the password of a stored login.

use crate::cli::output;
use crate::cli::{log_operation, prompt_login_password, prompt_master_secret, vault_path, Cli};
use crate::errors::{Result, StegPassError};
use crate::vault::VaultStore;

/// Execute the `edit` command.
pub fn execute(cli: &Cli, id: i64) -> Result<()> {
    let path = vault_path(cli)?;

    let master_secret = prompt_master_secret()?;
    let mut store = VaultStore::open(&path, &master_secret)?;

    // Look the row up before prompting so an unknown id fails immediately.
    let username = store
        .get(id)
        .ok_or(StegPassError::LoginNotFound(id))?
        .username
        .clone();

    let new_password = prompt_login_password(&username)?;
    store.update_password(id, &new_password)?;

    log_operation(&path, "edit", None, Some("password updated"));
    output::success(&format!("Password updated for login {id} ('{username}')"));

    Ok(())
}
