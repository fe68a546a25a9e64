//! Sub-key derivation using HKDF-SHA256.
//!
//! From the single Argon2-derived storage key we derive two independent
//! sub-keys: one that encrypts the vault container and one that authenticates
//! it.  HKDF (RFC 5869) uses the storage key as input keying material and a
//! context string (`info`) to produce the two without them revealing each
//! other.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, StegPassError};

/// Length of derived sub-keys (256 bits).
const KEY_LEN: usize = 32;

/// Derive the AES-256-GCM key that encrypts the vault container.
pub fn derive_cipher_key(storage_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(storage_key, b"stegpass-cipher-key")
}

/// Derive the HMAC key used for the vault's integrity tag.
///
/// Verifying this tag is the canary check that tells us the master secret
/// was correct before any decryption is attempted.
pub fn derive_hmac_key(storage_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(storage_key, b"stegpass-hmac-key")
}

/// Internal helper: run HKDF-SHA256 expand with the given `info`.
///
/// We skip the `extract` step and use the storage key directly as the
/// pseudo-random key, because it already has high entropy (it came from
/// Argon2id).
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| StegPassError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A wrapper around the 32-byte storage key that automatically zeroes its
/// memory when dropped.
///
/// Holding the key in this type keeps it from lingering in memory after the
/// vault handle goes away.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct StorageKey {
    bytes: [u8; KEY_LEN],
}

impl StorageKey {
    /// Create a new `StorageKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive the container encryption key.
    pub fn derive_cipher_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_cipher_key(&self.bytes)
    }

    /// Derive the integrity HMAC key.
    pub fn derive_hmac_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_hmac_key(&self.bytes)
    }
}
