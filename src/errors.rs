use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in StegPass.
#[derive(Debug, Error)]
pub enum StegPassError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong master secret or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("HMAC error: {0}")]
    HmacError(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    /// Deliberately vague: a wrong secret and a tampered vault produce the
    /// same message so a caller cannot tell them apart.
    #[error("Vault authentication failed — wrong master secret or corrupted vault")]
    InvalidSecret,

    #[error("No login with id {0}")]
    LoginNotFound(i64),

    #[error("Invalid login: {0}")]
    InvalidLogin(String),

    #[error("At least one of --uri or --username must be given")]
    EmptyCriteria,

    // --- Stego errors ---
    #[error("Unsupported image mode: {0} — only 8-bit RGB and RGBA carriers are accepted")]
    UnsupportedImageMode(String),

    #[error("Payload needs {needed_bits} bits but the cover image only holds {available_bits}")]
    CapacityExceeded {
        needed_bits: usize,
        available_bits: usize,
    },

    #[error("No end marker found — the image does not carry a payload")]
    MarkerNotFound,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for StegPass results.
pub type Result<T> = std::result::Result<T, StegPassError>;
