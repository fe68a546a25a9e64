//! `stegpass reveal` — recover a vault file from a carrier image.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{log_operation, Cli};
use crate::errors::{Result, StegPassError};
use crate::stego;
use crate::vault::format;

/// Execute the `reveal` command.
pub fn execute(_cli: &Cli, image: &Path, output_path: &Path) -> Result<()> {
    if output_path.exists() {
        return Err(StegPassError::VaultAlreadyExists(output_path.to_path_buf()));
    }

    let carrier = stego::load_cover(image)?;
    let payload = stego::extract(&carrier)?;

    if !format::looks_like_vault(&payload) {
        output::warning("Recovered bytes do not look like a StegPass vault — writing them anyway.");
    }

    fs::write(output_path, &payload)?;

    log_operation(output_path, "reveal", None, Some("vault recovered from image"));
    output::success(&format!(
        "Recovered {} bytes to {}",
        payload.len(),
        output_path.display()
    ));
    output::tip(&format!(
        "Open it with `stegpass --vault {} query --uri <site>`.",
        output_path.display()
    ));

    Ok(())
}
