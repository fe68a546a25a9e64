//! `stegpass add` — store a login for a site.

use crate::cli::output;
use crate::cli::{log_operation, prompt_login_password, prompt_master_secret, vault_path, Cli};
use crate::errors::Result;
use crate::vault::{NewLogin, VaultStore};

/// Execute the `add` command.
pub fn execute(cli: &Cli, uri: &str, username: &str) -> Result<()> {
    let path = vault_path(cli)?;

    // Gather the login password first; the vault is only unlocked once all
    // input is in hand.
    let password = prompt_login_password(username)?;

    let master_secret = prompt_master_secret()?;
    let mut store = VaultStore::open(&path, &master_secret)?;

    let id = store.insert(NewLogin {
        username: username.to_string(),
        password: password.to_string(),
        uri: Some(uri.to_string()),
    })?;

    log_operation(&path, "add", Some(uri), Some("inserted"));
    output::success(&format!(
        "Login for '{username}' at '{uri}' saved with id {id} ({} total)",
        store.login_count()
    ));

    Ok(())
}
