//! LSB embed/extract over decoded pixel samples.
//!
//! Wire format: `payload || "$STEGPASS$"`, expanded to bits MSB-first per
//! byte, written into the least-significant bit of channels R, G, B of each
//! pixel in row-major order.  The alpha channel of RGBA carriers is never
//! touched, and samples past the payload keep their original values.
//!
//! The end marker delimits the payload instead of a length prefix, so the
//! format stays self-describing without reserving header bits.  Embed and
//! extract must agree on it bit-for-bit; treat it as frozen.

use image::DynamicImage;

use crate::errors::{Result, StegPassError};

/// Fixed sentinel appended to every payload.
pub const END_MARKER: &[u8] = b"$STEGPASS$";

/// Bit slots per pixel: R, G, B.  Alpha is left alone.
const USABLE_CHANNELS: usize = 3;

/// Number of bit slots a cover image offers.
///
/// Only 8-bit RGB and RGBA buffers qualify; anything else — grayscale,
/// 16-bit, float — fails with `UnsupportedImageMode` before any pixel is
/// read.  Palette carriers never get this far: the decoder resolves them to
/// samples, and this gate keeps every other non-sample layout out.
pub fn capacity_bits(cover: &DynamicImage) -> Result<usize> {
    match cover {
        DynamicImage::ImageRgb8(buf) => Ok(pixel_bits(buf.width(), buf.height())),
        DynamicImage::ImageRgba8(buf) => Ok(pixel_bits(buf.width(), buf.height())),
        other => Err(unsupported_mode(other)),
    }
}

/// Largest payload, in bytes, that fits the cover alongside the end marker.
pub fn capacity_bytes(cover: &DynamicImage) -> Result<usize> {
    Ok((capacity_bits(cover)? / 8).saturating_sub(END_MARKER.len()))
}

/// Hide `payload` in a copy of `cover`.
///
/// The input image is never modified; capacity is checked before the copy
/// is written to, so a `CapacityExceeded` failure leaves nothing behind.
pub fn embed(payload: &[u8], cover: &DynamicImage) -> Result<DynamicImage> {
    let needed_bits = (payload.len() + END_MARKER.len()) * 8;

    match cover {
        DynamicImage::ImageRgb8(buf) => {
            ensure_capacity(needed_bits, pixel_bits(buf.width(), buf.height()))?;
            let mut out = buf.clone();
            write_bits(&mut out, 3, payload);
            Ok(DynamicImage::ImageRgb8(out))
        }
        DynamicImage::ImageRgba8(buf) => {
            ensure_capacity(needed_bits, pixel_bits(buf.width(), buf.height()))?;
            let mut out = buf.clone();
            write_bits(&mut out, 4, payload);
            Ok(DynamicImage::ImageRgba8(out))
        }
        other => Err(unsupported_mode(other)),
    }
}

/// Recover the payload hidden in `cover`.
///
/// Reads the LSB stream in the same scan order as `embed` and returns every
/// byte before the first occurrence of the end marker.  `MarkerNotFound` if
/// the stream runs out first — including on images nothing was embedded in.
pub fn extract(cover: &DynamicImage) -> Result<Vec<u8>> {
    let (samples, samples_per_pixel): (&[u8], usize) = match cover {
        DynamicImage::ImageRgb8(buf) => (buf.as_raw(), 3),
        DynamicImage::ImageRgba8(buf) => (buf.as_raw(), 4),
        other => return Err(unsupported_mode(other)),
    };

    let pixel_count = samples.len() / samples_per_pixel;
    let total_bits = pixel_count * USABLE_CHANNELS;

    let mut bytes: Vec<u8> = Vec::with_capacity(total_bits / 8);
    let mut acc = 0u8;
    let mut filled = 0u8;

    for index in 0..total_bits {
        let slot = (index / USABLE_CHANNELS) * samples_per_pixel + index % USABLE_CHANNELS;
        acc = (acc << 1) | (samples[slot] & 1);
        filled += 1;

        if filled == 8 {
            bytes.push(acc);
            acc = 0;
            filled = 0;

            if bytes.ends_with(END_MARKER) {
                bytes.truncate(bytes.len() - END_MARKER.len());
                return Ok(bytes);
            }
        }
    }

    Err(StegPassError::MarkerNotFound)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn pixel_bits(width: u32, height: u32) -> usize {
    width as usize * height as usize * USABLE_CHANNELS
}

fn ensure_capacity(needed_bits: usize, available_bits: usize) -> Result<()> {
    if needed_bits > available_bits {
        return Err(StegPassError::CapacityExceeded {
            needed_bits,
            available_bits,
        });
    }
    Ok(())
}

fn unsupported_mode(cover: &DynamicImage) -> StegPassError {
    StegPassError::UnsupportedImageMode(format!("{:?}", cover.color()))
}

/// Iterate the bits of `payload || END_MARKER`, MSB-first per byte.
fn marked_bits(payload: &[u8]) -> impl Iterator<Item = u8> + '_ {
    payload
        .iter()
        .chain(END_MARKER.iter())
        .flat_map(|&byte| (0..8u8).map(move |i| (byte >> (7 - i)) & 1))
}

/// Overwrite the LSB of the first `bits` usable samples, row-major,
/// channels R then G then B within a pixel.
fn write_bits(samples: &mut [u8], samples_per_pixel: usize, payload: &[u8]) {
    for (index, bit) in marked_bits(payload).enumerate() {
        let slot = (index / USABLE_CHANNELS) * samples_per_pixel + index % USABLE_CHANNELS;
        samples[slot] = (samples[slot] & !1) | bit;
    }
}
