//! `stegpass gen` — generate a password, copy it, and offer to save it.

use rand::seq::SliceRandom;
use rand::Rng;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{
    copy_to_clipboard, log_operation, prompt_master_secret, vault_path, Cli,
    MIN_LOGIN_PASSWORD_LEN,
};
use crate::errors::{Result, StegPassError};
use crate::vault::{NewLogin, VaultStore};

const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Execute the `gen` command.
pub fn execute(cli: &Cli, uri: &str, username: &str, length: Option<usize>) -> Result<()> {
    let path = vault_path(cli)?;
    if !path.exists() {
        output::tip("Use `stegpass init` to create a vault first.");
        return Err(StegPassError::VaultNotFound(path));
    }

    let length = match length {
        Some(len) if len >= MIN_LOGIN_PASSWORD_LEN => len,
        Some(len) => {
            return Err(StegPassError::CommandFailed(format!(
                "length {len} is too short — minimum is {MIN_LOGIN_PASSWORD_LEN}"
            )))
        }
        None => prompt_length()?,
    };

    let password = Zeroizing::new(generate_password(length));

    match copy_to_clipboard(&password) {
        Ok(()) => output::success("Your new password has been copied to the clipboard."),
        Err(_) => {
            output::warning("Clipboard unavailable — printing the password instead.");
            println!("{}", *password);
        }
    }

    let save = dialoguer::Confirm::new()
        .with_prompt(format!("Save this login for '{username}' at '{uri}'?"))
        .default(true)
        .interact()
        .map_err(|e| StegPassError::CommandFailed(format!("confirm prompt: {e}")))?;

    if !save {
        output::info("Password not saved.");
        return Ok(());
    }

    let master_secret = prompt_master_secret()?;
    let mut store = VaultStore::open(&path, &master_secret)?;
    let id = store.insert(NewLogin {
        username: username.to_string(),
        password: password.to_string(),
        uri: Some(uri.to_string()),
    })?;

    log_operation(&path, "gen", Some(uri), Some("generated and inserted"));
    output::success(&format!("Login saved with id {id}"));

    Ok(())
}

/// Ask for the password length, re-prompting until it meets the minimum.
fn prompt_length() -> Result<usize> {
    loop {
        let length: usize = dialoguer::Input::new()
            .with_prompt(format!(
                "How many characters long should the password be? (min. {MIN_LOGIN_PASSWORD_LEN})"
            ))
            .interact_text()
            .map_err(|e| StegPassError::CommandFailed(format!("length prompt: {e}")))?;

        if length >= MIN_LOGIN_PASSWORD_LEN {
            return Ok(length);
        }
        output::warning(&format!(
            "Invalid length — minimum is {MIN_LOGIN_PASSWORD_LEN}."
        ));
    }
}

/// Build a random password of `length` characters.
///
/// Guarantees at least one digit and one symbol, then fills the rest from
/// the full charset and shuffles so the guaranteed characters don't sit at
/// fixed positions.
fn generate_password(length: usize) -> String {
    let mut charset: Vec<u8> = Vec::new();
    charset.extend(b'a'..=b'z');
    charset.extend(b'A'..=b'Z');
    charset.extend_from_slice(DIGITS);
    charset.extend_from_slice(SYMBOLS);

    let mut rng = rand::rng();
    let mut password: Vec<u8> = Vec::with_capacity(length);

    password.push(DIGITS[rng.random_range(0..DIGITS.len())]);
    password.push(SYMBOLS[rng.random_range(0..SYMBOLS.len())]);
    while password.len() < length {
        password.push(charset[rng.random_range(0..charset.len())]);
    }

    password.shuffle(&mut rng);
    password.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_has_requested_length() {
        for length in [7, 12, 40] {
            assert_eq!(generate_password(length).len(), length);
        }
    }

    #[test]
    fn generated_password_contains_digit_and_symbol() {
        for _ in 0..20 {
            let password = generate_password(7);
            assert!(
                password.bytes().any(|b| DIGITS.contains(&b)),
                "no digit in {password:?}"
            );
            assert!(
                password.bytes().any(|b| SYMBOLS.contains(&b)),
                "no symbol in {password:?}"
            );
        }
    }

    #[test]
    fn generated_passwords_differ() {
        let a = generate_password(20);
        let b = generate_password(20);
        assert_ne!(a, b);
    }
}
