//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::errors::{Result, StegPassError};
use crate::vault::Login;

/// Minimum master secret length to prevent trivially weak vault secrets.
const MIN_MASTER_SECRET_LEN: usize = 8;

/// Minimum length for stored login passwords.
const MIN_LOGIN_PASSWORD_LEN: usize = 7;

/// StegPass CLI: encrypted password vault with an image hiding place.
#[derive(Parser)]
#[command(
    name = "stegpass",
    about = "Encrypted password vault that can hide inside an image",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file to operate on (default: vault.spv, or `default_vault`
    /// from .stegpass.toml)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault
    Init,

    /// Add a login for a site
    Add {
        /// Site or service the login belongs to (e.g. github.com)
        uri: String,
        /// Account name (e.g. alice@example.com)
        username: String,
    },

    /// Generate a password, copy it to the clipboard, and offer to save it
    Gen {
        /// Site or service the login belongs to
        uri: String,
        /// Account name
        username: String,
        /// Password length (prompted interactively if omitted)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Look up logins by uri/username substring
    Query {
        /// Substring the login's uri must contain
        #[arg(long)]
        uri: Option<String>,
        /// Substring the login's username must contain
        #[arg(long)]
        username: Option<String>,
        /// Print the password to stdout instead of copying it
        #[arg(long)]
        show: bool,
    },

    /// Change the password of a stored login
    Edit {
        /// Id of the login to change
        id: i64,
    },

    /// Remove a login
    Rem {
        /// Id of the login to remove
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Hide the vault file inside a cover image
    Hide {
        /// Cover image (8-bit RGB or RGBA)
        cover: PathBuf,
        /// Output path (default: <cover stem>-stego.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recover a vault file from a carrier image
    Reveal {
        /// Image carrying a hidden vault
        image: PathBuf,
        /// Where to write the recovered vault file
        output: PathBuf,
    },

    /// View the audit log of vault operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master secret, trying in order:
/// 1. `STEGPASS_PASSWORD` env var (scripting/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the secret is wiped from memory on drop.
pub fn prompt_master_secret() -> Result<Zeroizing<String>> {
    if let Ok(secret) = std::env::var("STEGPASS_PASSWORD") {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret));
        }
    }

    let secret = dialoguer::Password::new()
        .with_prompt("Master secret")
        .interact()
        .map_err(|e| StegPassError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Prompt for a new master secret with confirmation (used during `init`).
///
/// Also respects `STEGPASS_PASSWORD` for scripted usage.  Enforces a
/// minimum length.
pub fn prompt_new_master_secret() -> Result<Zeroizing<String>> {
    if let Ok(secret) = std::env::var("STEGPASS_PASSWORD") {
        if !secret.is_empty() {
            if secret.len() < MIN_MASTER_SECRET_LEN {
                return Err(StegPassError::CommandFailed(format!(
                    "master secret must be at least {MIN_MASTER_SECRET_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(secret));
        }
    }

    loop {
        let secret = dialoguer::Password::new()
            .with_prompt("Choose a master secret")
            .with_confirmation("Confirm master secret", "Secrets do not match, try again")
            .interact()
            .map_err(|e| StegPassError::CommandFailed(format!("secret prompt: {e}")))?;

        if secret.len() < MIN_MASTER_SECRET_LEN {
            output::warning(&format!(
                "Master secret must be at least {MIN_MASTER_SECRET_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(secret));
    }
}

/// Get a login password from the user.
///
/// When stdin is piped, the first line is taken as the password (so tests
/// and scripts can drive `add`).  Interactively, re-prompts in a loop until
/// the minimum length is met.
pub fn prompt_login_password(username: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']).to_string();
        if password.len() < MIN_LOGIN_PASSWORD_LEN {
            return Err(StegPassError::CommandFailed(format!(
                "password must be at least {MIN_LOGIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(Zeroizing::new(password));
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt(format!("Password for {username}"))
            .interact()
            .map_err(|e| StegPassError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_LOGIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_LOGIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Resolve the vault path from the CLI arguments and settings.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let settings = crate::config::Settings::load(&cwd)?;
    Ok(settings.vault_path(&cwd, cli.vault.as_deref()))
}

/// Copy `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| StegPassError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text)
        .map_err(|e| StegPassError::CommandFailed(format!("clipboard write: {e}")))?;
    Ok(())
}

/// Record an operation in the audit log, when the feature is compiled in.
pub(crate) fn log_operation(vault: &Path, op: &str, uri: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(vault, op, uri, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (vault, op, uri, details);
}

// ---------------------------------------------------------------------------
// Disambiguation
// ---------------------------------------------------------------------------

/// Parse a 1-based selection into a 0-based index.
///
/// Returns `None` for non-numeric input and for indices outside `1..=count`.
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    let picked: usize = input.trim().parse().ok()?;
    if picked >= 1 && picked <= count {
        Some(picked - 1)
    } else {
        None
    }
}

/// Let the user pick exactly one login out of several matches.
///
/// Matches are shown in id order; the user selects by 1-based index.
/// Invalid input never mutates anything — we just re-prompt, iteratively,
/// until a valid index or an explicit `q`.
pub fn select_login<'a>(matches: &'a [Login]) -> Result<&'a Login> {
    if matches.len() == 1 {
        return Ok(&matches[0]);
    }

    output::info(&format!("{} logins matched:", matches.len()));
    output::print_logins_table(matches);

    loop {
        let input: String = dialoguer::Input::new()
            .with_prompt(format!("Select a login [1-{}, q to cancel]", matches.len()))
            .interact_text()
            .map_err(|e| StegPassError::CommandFailed(format!("selection prompt: {e}")))?;

        if input.trim().eq_ignore_ascii_case("q") {
            return Err(StegPassError::UserCancelled);
        }

        match parse_selection(&input, matches.len()) {
            Some(index) => return Ok(&matches[index]),
            None => {
                output::warning(&format!(
                    "Enter a number between 1 and {}, or q to cancel.",
                    matches.len()
                ));
            }
        }
    }
}
