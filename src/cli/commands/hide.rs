//! `stegpass hide` — conceal the vault file inside a cover image.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{log_operation, vault_path, Cli};
use crate::errors::{Result, StegPassError};
use crate::stego;

/// Execute the `hide` command.
///
/// No master secret is needed: the vault's on-disk bytes are already
/// encrypted, and the codec treats them as an opaque payload.
pub fn execute(cli: &Cli, cover: &Path, output_path: Option<&Path>) -> Result<()> {
    let path = vault_path(cli)?;
    if !path.exists() {
        return Err(StegPassError::VaultNotFound(path));
    }

    let payload = fs::read(&path)?;
    let cover_image = stego::load_cover(cover)?;

    let capacity = stego::capacity_bytes(&cover_image)?;
    let stego_image = stego::embed(&payload, &cover_image)?;

    let default_output = stego::default_output_path(cover);
    let output_file = output_path.unwrap_or(&default_output);
    stego::save_stego(&stego_image, output_file, cover)?;

    log_operation(&path, "hide", None, Some("vault embedded in image"));
    output::success(&format!(
        "Hid {} vault bytes in {} ({} byte capacity)",
        payload.len(),
        output_file.display(),
        capacity
    ));
    output::tip("Recover it later with `stegpass reveal <image> <vault>`.");

    Ok(())
}
