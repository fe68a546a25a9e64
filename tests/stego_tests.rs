//! Integration tests for the StegPass LSB codec and carrier I/O.

use image::{DynamicImage, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
use stegpass::errors::StegPassError;
use stegpass::stego;
use tempfile::TempDir;

/// An RGB cover with varied channel values (so LSB writes actually flip
/// some bits both ways).
fn rgb_cover(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let base = (x * 7 + y * 13) as u8;
        Rgb([base, base.wrapping_add(85), base.wrapping_add(170)])
    }))
}

/// An RGBA cover with a non-trivial alpha plane.
fn rgba_cover(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        let base = (x * 11 + y * 3) as u8;
        Rgba([base, base.wrapping_add(60), base.wrapping_add(120), 200 + (x % 37) as u8])
    }))
}

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn embed_extract_roundtrip_rgb() {
    let cover = rgb_cover(64, 64);
    let payload: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();

    let stego_image = stego::embed(&payload, &cover).expect("embed");
    let recovered = stego::extract(&stego_image).expect("extract");

    assert_eq!(recovered, payload);
}

#[test]
fn embed_extract_roundtrip_rgba() {
    let cover = rgba_cover(48, 48);
    let payload = b"binary \x00\xff\x7f payload with a partial marker $STEGPASS inside";

    let stego_image = stego::embed(payload, &cover).expect("embed");
    let recovered = stego::extract(&stego_image).expect("extract");

    assert_eq!(recovered, payload);
}

#[test]
fn empty_payload_roundtrips() {
    let cover = rgb_cover(8, 8);

    let stego_image = stego::embed(&[], &cover).expect("embed");
    let recovered = stego::extract(&stego_image).expect("extract");

    assert!(recovered.is_empty());
}

// ---------------------------------------------------------------------------
// Bit placement
// ---------------------------------------------------------------------------

#[test]
fn bits_land_msb_first_in_scan_order() {
    let cover = rgb_cover(16, 16);

    // 0x80 = 1000_0000: first sample's LSB becomes 1, the next seven 0.
    let stego_image = stego::embed(&[0x80], &cover).expect("embed");

    let samples = match &stego_image {
        DynamicImage::ImageRgb8(buf) => buf.as_raw(),
        _ => panic!("embed changed the buffer type"),
    };
    assert_eq!(samples[0] & 1, 1);
    for sample in &samples[1..8] {
        assert_eq!(sample & 1, 0);
    }
}

#[test]
fn embed_touches_only_the_lsb_plane() {
    let cover = rgb_cover(32, 32);
    let payload = b"small payload";

    let stego_image = stego::embed(payload, &cover).expect("embed");

    let (before, after) = match (&cover, &stego_image) {
        (DynamicImage::ImageRgb8(a), DynamicImage::ImageRgb8(b)) => (a.as_raw(), b.as_raw()),
        _ => panic!("unexpected buffer types"),
    };

    let used_bits = (payload.len() + stego::END_MARKER.len()) * 8;
    for (i, (orig, new)) in before.iter().zip(after.iter()).enumerate() {
        assert_eq!(orig & !1, new & !1, "upper bits changed at sample {i}");
        if i >= used_bits {
            assert_eq!(orig, new, "sample {i} past the payload was touched");
        }
    }
}

#[test]
fn alpha_channel_is_never_modified() {
    let cover = rgba_cover(32, 32);
    let payload = vec![0xFFu8; 256]; // all-ones payload forces LSB writes

    let stego_image = stego::embed(&payload, &cover).expect("embed");

    let (before, after) = match (&cover, &stego_image) {
        (DynamicImage::ImageRgba8(a), DynamicImage::ImageRgba8(b)) => (a.as_raw(), b.as_raw()),
        _ => panic!("unexpected buffer types"),
    };

    for (i, (orig, new)) in before.iter().zip(after.iter()).enumerate() {
        if i % 4 == 3 {
            assert_eq!(orig, new, "alpha sample {i} was modified");
        }
    }
}

#[test]
fn embed_does_not_mutate_the_cover() {
    let cover = rgb_cover(16, 16);
    let pristine = cover.clone();

    stego::embed(b"payload", &cover).expect("embed");

    assert_eq!(cover.as_bytes(), pristine.as_bytes());
}

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

#[test]
fn payload_filling_every_bit_slot_embeds() {
    // 8x8 RGB = 192 bit slots = 24 bytes; marker takes 10, payload 14.
    let cover = rgb_cover(8, 8);
    let payload = vec![0xA5u8; 14];

    let stego_image = stego::embed(&payload, &cover).expect("exact fit must embed");
    assert_eq!(stego::extract(&stego_image).unwrap(), payload);
}

#[test]
fn one_byte_over_capacity_fails_cleanly() {
    let cover = rgb_cover(8, 8);
    let pristine = cover.clone();
    let payload = vec![0xA5u8; 15];

    let result = stego::embed(&payload, &cover);
    match result {
        Err(StegPassError::CapacityExceeded {
            needed_bits,
            available_bits,
        }) => {
            assert_eq!(needed_bits, (15 + stego::END_MARKER.len()) * 8);
            assert_eq!(available_bits, 8 * 8 * 3);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }

    // Failure leaves the cover byte-for-byte unchanged.
    assert_eq!(cover.as_bytes(), pristine.as_bytes());
}

#[test]
fn capacity_bytes_accounts_for_the_marker() {
    let cover = rgb_cover(8, 8);
    assert_eq!(stego::capacity_bytes(&cover).unwrap(), 14);
}

// ---------------------------------------------------------------------------
// Mode rejection
// ---------------------------------------------------------------------------

#[test]
fn grayscale_cover_is_rejected() {
    let gray = DynamicImage::ImageLuma8(GrayImage::new(16, 16));

    assert!(matches!(
        stego::embed(b"data", &gray),
        Err(StegPassError::UnsupportedImageMode(_))
    ));
    assert!(matches!(
        stego::extract(&gray),
        Err(StegPassError::UnsupportedImageMode(_))
    ));
    assert!(stego::capacity_bytes(&gray).is_err());
}

#[test]
fn sixteen_bit_cover_is_rejected() {
    let deep = DynamicImage::ImageRgb16(image::ImageBuffer::new(8, 8));

    assert!(matches!(
        stego::embed(b"data", &deep),
        Err(StegPassError::UnsupportedImageMode(_))
    ));
}

// ---------------------------------------------------------------------------
// Marker handling
// ---------------------------------------------------------------------------

#[test]
fn extract_without_marker_fails() {
    // Every channel value even → every LSB zero → no marker in the stream.
    let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([2, 4, 6])));

    assert!(matches!(
        stego::extract(&blank),
        Err(StegPassError::MarkerNotFound)
    ));
}

// ---------------------------------------------------------------------------
// Carrier I/O
// ---------------------------------------------------------------------------

#[test]
fn png_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let cover_path = dir.path().join("cover.png");
    let stego_path = dir.path().join("cover-stego.png");

    rgb_cover(64, 64).save(&cover_path).unwrap();

    let cover = stego::load_cover(&cover_path).expect("load cover");
    let payload = b"vault bytes pretending to be here";
    let stego_image = stego::embed(payload, &cover).expect("embed");
    stego::save_stego(&stego_image, &stego_path, &cover_path).expect("save");

    // PNG is lossless, so the LSB plane must survive the disk trip.
    let reloaded = stego::load_cover(&stego_path).expect("reload");
    assert_eq!(stego::extract(&reloaded).unwrap(), payload);
}

#[test]
fn save_refuses_to_overwrite_the_cover() {
    let dir = TempDir::new().unwrap();
    let cover_path = dir.path().join("cover.png");

    // All channel values even, so an untouched cover has an all-zero LSB plane.
    let plain = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([8, 16, 24])));
    plain.save(&cover_path).unwrap();
    let cover = stego::load_cover(&cover_path).unwrap();
    let stego_image = stego::embed(b"x", &cover).unwrap();

    let result = stego::save_stego(&stego_image, &cover_path, &cover_path);
    assert!(result.is_err(), "cover image must never be overwritten");

    // The cover still extracts to nothing, proving it was untouched.
    let untouched = stego::load_cover(&cover_path).unwrap();
    assert!(matches!(
        stego::extract(&untouched),
        Err(StegPassError::MarkerNotFound)
    ));
}
