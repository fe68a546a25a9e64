//! `stegpass query` — look up logins by substring and hand over a password.

use crate::cli::output;
use crate::cli::{
    copy_to_clipboard, prompt_master_secret, select_login, vault_path, Cli,
};
use crate::errors::{Result, StegPassError};
use crate::vault::{LoginFilter, VaultStore};

/// Execute the `query` command.
pub fn execute(cli: &Cli, uri: Option<&str>, username: Option<&str>, show: bool) -> Result<()> {
    let filter = LoginFilter {
        uri: uri.map(String::from),
        username: username.map(String::from),
    };

    // Criteria are validated before the secret prompt.
    if filter.is_empty() {
        return Err(StegPassError::EmptyCriteria);
    }

    let path = vault_path(cli)?;
    let master_secret = prompt_master_secret()?;
    let store = VaultStore::open(&path, &master_secret)?;

    let matches = store.query_by_substring(&filter)?;
    if matches.is_empty() {
        output::info("No logins matched.");
        return Ok(());
    }

    let login = select_login(&matches)?;

    if show {
        println!("{}", login.password);
        return Ok(());
    }

    match copy_to_clipboard(&login.password) {
        Ok(()) => {
            output::success(&format!(
                "Password for '{}' copied to the clipboard.",
                login.username
            ));
            Ok(())
        }
        Err(_) => Err(StegPassError::CommandFailed(
            "clipboard unavailable — rerun with --show to print the password".into(),
        )),
    }
}
