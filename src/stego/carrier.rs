//! Carrier image I/O for the stego pipeline.
//!
//! Decoding goes through the `image` crate, which resolves palette and
//! interlaced sources into raw samples; the codec's mode gate then decides
//! whether the decoded buffer is usable.  Output is always PNG — a lossy
//! encoder would destroy the LSB plane on the way out.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::errors::{Result, StegPassError};

/// Decode the cover image at `path`.
pub fn load_cover(path: &Path) -> Result<DynamicImage> {
    let image = ImageReader::open(path)?.decode()?;
    Ok(image)
}

/// Write a stego image to `output` as PNG.
///
/// Refuses to overwrite the cover image the payload came from — the output
/// is always a new file next to the original.
pub fn save_stego(image: &DynamicImage, output: &Path, cover: &Path) -> Result<()> {
    if output.exists() {
        let same_file = match (fs::canonicalize(output), fs::canonicalize(cover)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if same_file {
            return Err(StegPassError::CommandFailed(
                "output path is the cover image — refusing to overwrite it".into(),
            ));
        }
    }

    image.save_with_format(output, ImageFormat::Png)?;
    Ok(())
}

/// Default output path for `hide`: `<cover stem>-stego.png` next to the
/// cover.
pub fn default_output_path(cover: &Path) -> PathBuf {
    let stem = cover
        .file_stem()
        .map_or_else(|| "cover".to_string(), |s| s.to_string_lossy().into_owned());
    cover.with_file_name(format!("{stem}-stego.png"))
}
