//! The gate between a master secret and an unlocked vault.
//!
//! Two concerns live here, kept deliberately separate so one can change
//! without the other:
//!
//! - **Storage-key derivation** (`kdf::derive_storage_key`): turns the master
//!   secret into the key that parameterizes the container encryption.
//! - **Secret verification** (`verify_against_vault` / `unlock_envelope`):
//!   the canary check.  The envelope's HMAC is recomputed under the derived
//!   key and compared constant-time against the stored tag.  A mismatch is an
//!   explicit `Invalid` verdict, not an error — wrong secret and tampered
//!   vault are indistinguishable on purpose (single-user threat model).
//!
//! Hard failures (I/O faults, malformed envelopes) travel on the normal
//! error channel and are never folded into the verdict.

use std::path::Path;

use zeroize::Zeroize;

use crate::crypto::kdf::{derive_storage_key, Argon2Params};
use crate::crypto::keys::StorageKey;
use crate::errors::Result;
use crate::vault::format::{self, RawEnvelope};

/// Verdict of the canary check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretCheck {
    Valid,
    Invalid,
}

impl SecretCheck {
    pub fn is_valid(self) -> bool {
        matches!(self, SecretCheck::Valid)
    }
}

/// Result of attempting to unlock a raw envelope.
///
/// `Granted` carries the storage key so the caller never re-derives it —
/// there is exactly one Argon2 pass per logical operation.
pub enum GateOutcome {
    Granted(StorageKey),
    Denied,
}

/// Derive the storage key for `raw` and run the canary check against its
/// integrity tag.
///
/// After a `Granted` outcome the caller decrypts unconditionally; there is
/// no further branching on secret correctness past this point.
pub fn unlock_envelope(raw: &RawEnvelope, master_secret: &str) -> Result<GateOutcome> {
    let stored = raw.header.argon2_params;
    let params = Argon2Params {
        memory_kib: stored.memory_kib,
        iterations: stored.iterations,
        parallelism: stored.parallelism,
    };

    let mut key_bytes = derive_storage_key(master_secret.as_bytes(), &raw.header.salt, &params)?;
    let storage_key = StorageKey::new(key_bytes);
    key_bytes.zeroize();

    let mut hmac_key = storage_key.derive_hmac_key()?;
    let check = format::verify_hmac(
        &hmac_key,
        &raw.header_bytes,
        &raw.ciphertext,
        &raw.stored_hmac,
    );
    hmac_key.zeroize();

    match check? {
        SecretCheck::Valid => Ok(GateOutcome::Granted(storage_key)),
        SecretCheck::Invalid => Ok(GateOutcome::Denied),
    }
}

/// Check whether `master_secret` unlocks the vault at `path` without
/// returning a handle.
///
/// `VaultNotFound` and envelope-format errors propagate as errors; only a
/// well-formed envelope produces a verdict.
pub fn verify_against_vault(path: &Path, master_secret: &str) -> Result<SecretCheck> {
    let raw = format::read_envelope(path)?;
    match unlock_envelope(&raw, master_secret)? {
        GateOutcome::Granted(_) => Ok(SecretCheck::Valid),
        GateOutcome::Denied => Ok(SecretCheck::Invalid),
    }
}
