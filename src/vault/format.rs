//! Binary vault envelope format and HMAC integrity verification.
//!
//! A `.spv` file has this layout:
//!
//! ```text
//! [SPVT: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][ciphertext][HMAC-SHA256: 32 bytes]
//! ```
//!
//! - **Magic** (`SPVT`): identifies the file as a StegPass vault.
//! - **Version**: format version (currently `1`).
//! - **Header length**: little-endian u32 telling us where the header JSON
//!   ends and the ciphertext begins.
//! - **Header JSON**: serialized `VaultHeader` — salt, Argon2 parameters,
//!   creation time.  Cleartext, because it must be readable before the
//!   storage key exists.
//! - **Ciphertext**: AES-256-GCM output (nonce || ciphertext) over the
//!   serialized login table.
//! - **HMAC-SHA256**: 32-byte tag over header + ciphertext bytes.
//!   Recomputing this tag under the derived key is the canary read that
//!   confirms a master secret before anything is decrypted.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::crypto::gate::SecretCheck;
use crate::errors::{Result, StegPassError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"SPVT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the HMAC tag appended to the file (SHA-256 = 32 bytes).
const HMAC_LEN: usize = 32;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Argon2 parameters stored in the vault header so the exact same KDF
/// settings are used when re-opening.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoredArgon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for StoredArgon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Metadata stored cleartext at the beginning of a vault file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,

    /// The salt used for Argon2id key derivation (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// Argon2 params used at vault creation (stored so open uses the same).
    pub argon2_params: StoredArgon2Params,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Write a vault envelope to disk **atomically**.
///
/// 1. Serialize the header to JSON.
/// 2. Compute HMAC over header + ciphertext bytes.
/// 3. Write to a temp file in the same directory.
/// 4. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_envelope(
    path: &Path,
    header: &VaultHeader,
    ciphertext: &[u8],
    hmac_key: &[u8],
) -> Result<()> {
    let header_bytes = serde_json::to_vec(header)
        .map_err(|e| StegPassError::SerializationError(format!("header: {e}")))?;

    let hmac_tag = compute_hmac(hmac_key, &header_bytes, ciphertext)?;

    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        StegPassError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;
    let total = PREFIX_LEN + header_bytes.len() + ciphertext.len() + HMAC_LEN;
    let mut buf = Vec::with_capacity(total);

    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(&header_bytes); // header JSON
    buf.extend_from_slice(ciphertext); // encrypted login table
    buf.extend_from_slice(&hmac_tag); // 32 bytes

    // Atomic write: write to a temp file, then rename.  The temp file is in
    // the same directory so the rename stays on one filesystem.
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, &buf)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Raw data read from a vault file on disk.
///
/// Keeps the original bytes so the HMAC can be verified over the exact
/// bytes that were written — no re-serialization needed.
pub struct RawEnvelope {
    pub header: VaultHeader,
    /// The raw header JSON bytes exactly as stored on disk.
    pub header_bytes: Vec<u8>,
    /// The encrypted login table (nonce || ciphertext).
    pub ciphertext: Vec<u8>,
    /// The HMAC tag stored at the end of the file.
    pub stored_hmac: Vec<u8>,
}

/// Read a vault file from disk and return its parts **with raw bytes**.
///
/// The caller must run the gate's canary check over `header_bytes` and
/// `ciphertext` before trusting or decrypting anything.
pub fn read_envelope(path: &Path) -> Result<RawEnvelope> {
    if !path.exists() {
        return Err(StegPassError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;

    // Minimum size: prefix + HMAC.
    let min_size = PREFIX_LEN + HMAC_LEN;
    if data.len() < min_size {
        return Err(StegPassError::InvalidVaultFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    // --- Parse the fixed-size prefix ---

    if &data[0..4] != MAGIC {
        return Err(StegPassError::InvalidVaultFormat(
            "missing SPVT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(StegPassError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| StegPassError::InvalidVaultFormat("bad header length".into()))?,
    );
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        StegPassError::InvalidVaultFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN + header_len;
    if header_end + HMAC_LEN > data.len() {
        return Err(StegPassError::InvalidVaultFormat(
            "header length exceeds file size".into(),
        ));
    }

    // --- Extract the three variable-length sections as raw bytes ---

    let header_bytes = data[PREFIX_LEN..header_end].to_vec();
    let ciphertext_end = data.len() - HMAC_LEN;
    let ciphertext = data[header_end..ciphertext_end].to_vec();
    let stored_hmac = data[ciphertext_end..].to_vec();

    let header: VaultHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| StegPassError::InvalidVaultFormat(format!("header JSON: {e}")))?;

    Ok(RawEnvelope {
        header,
        header_bytes,
        ciphertext,
        stored_hmac,
    })
}

/// Quick sniff test: does `data` start with the vault magic?
///
/// Used after a stego extraction to warn when the recovered bytes are not
/// a vault envelope.  Says nothing about integrity.
pub fn looks_like_vault(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// Compute HMAC-SHA256 over header + ciphertext bytes.
pub fn compute_hmac(hmac_key: &[u8], header_bytes: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| StegPassError::HmacError(format!("invalid HMAC key: {e}")))?;

    mac.update(header_bytes);
    mac.update(ciphertext);

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compare the stored HMAC against a freshly computed one.
///
/// Returns an explicit `Valid`/`Invalid` verdict rather than an error — a
/// mismatch is the expected outcome for a wrong master secret, not an
/// exceptional condition.  Uses `hmac::Mac::verify_slice`, which is
/// guaranteed constant-time.
pub fn verify_hmac(
    hmac_key: &[u8],
    header_bytes: &[u8],
    ciphertext: &[u8],
    expected_hmac: &[u8],
) -> Result<SecretCheck> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| StegPassError::HmacError(format!("invalid HMAC key: {e}")))?;

    mac.update(header_bytes);
    mac.update(ciphertext);

    match mac.verify_slice(expected_hmac) {
        Ok(()) => Ok(SecretCheck::Valid),
        Err(_) => Ok(SecretCheck::Invalid),
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
