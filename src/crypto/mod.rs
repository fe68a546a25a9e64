//! Cryptographic primitives for StegPass.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id master-secret key derivation (`kdf`)
//! - HKDF-based cipher-key and HMAC-key derivation (`keys`)
//! - The canary-check gate between secret and storage (`gate`)

pub mod encryption;
pub mod gate;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_storage_key, ...};
pub use encryption::{decrypt, encrypt};
pub use gate::{verify_against_vault, GateOutcome, SecretCheck};
pub use kdf::{derive_storage_key, generate_salt, Argon2Params};
pub use keys::{derive_cipher_key, derive_hmac_key, StorageKey};
