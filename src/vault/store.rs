//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` wraps the envelope format layer and the crypto layer so the
//! rest of the application can work with simple method calls like
//! `store.insert(new_login)`.  Every mutating method persists before it
//! returns: the atomic envelope write means a row is either fully committed
//! or not there at all.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::gate::{self, GateOutcome};
use crate::crypto::kdf::{derive_storage_key, generate_salt, Argon2Params};
use crate::crypto::keys::StorageKey;
use crate::errors::{Result, StegPassError};

use super::format::{self, StoredArgon2Params, VaultHeader, CURRENT_VERSION};
use super::login::{Login, LoginFilter, NewLogin};

/// The decrypted contents of the container: the login table plus the id
/// counter.  Serialized to JSON, then encrypted as one blob.
#[derive(Debug, Serialize, Deserialize)]
struct VaultBody {
    next_id: i64,
    logins: Vec<Login>,
}

/// The main vault handle.  Create one with `VaultStore::create` or
/// `VaultStore::open`, then use its methods to manage logins.  Dropping the
/// handle zeroizes the storage key; nothing is held open between calls.
pub struct VaultStore {
    /// Path to the `.spv` file on disk.
    path: PathBuf,

    /// Header metadata (version, salt, Argon2 params, created_at).
    header: VaultHeader,

    /// Next id to hand out.  Monotonic — deleting a row never frees its id.
    next_id: i64,

    /// Decrypted login table, kept in insertion (= ascending id) order.
    logins: Vec<Login>,

    /// The derived storage key (zeroized on drop).
    storage_key: StorageKey,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new vault file at `path`.
    ///
    /// Fails with `VaultAlreadyExists` if anything is already at `path`,
    /// without touching the existing file.  Otherwise generates a random
    /// salt, derives the storage key from the master secret, and writes an
    /// empty login table to disk.
    ///
    /// Pass `None` for `argon2_params` to use sensible defaults.
    pub fn create(
        path: &Path,
        master_secret: &str,
        argon2_params: Option<&Argon2Params>,
    ) -> Result<Self> {
        if path.exists() {
            return Err(StegPassError::VaultAlreadyExists(path.to_path_buf()));
        }

        let salt = generate_salt();
        let effective_params = argon2_params.copied().unwrap_or_default();

        let mut key_bytes =
            derive_storage_key(master_secret.as_bytes(), &salt, &effective_params)?;
        let storage_key = StorageKey::new(key_bytes);
        key_bytes.zeroize();

        let header = VaultHeader {
            version: CURRENT_VERSION,
            salt: salt.to_vec(),
            created_at: Utc::now(),
            argon2_params: StoredArgon2Params {
                memory_kib: effective_params.memory_kib,
                iterations: effective_params.iterations,
                parallelism: effective_params.parallelism,
            },
        };

        let store = Self {
            path: path.to_path_buf(),
            header,
            next_id: 1,
            logins: Vec::new(),
            storage_key,
        };

        store.save()?;

        Ok(store)
    }

    /// Open an existing vault, verifying the master secret first.
    ///
    /// Reads the envelope, runs the gate's canary check over the raw bytes
    /// from disk, and only then decrypts the login table.  A failed check
    /// surfaces as `InvalidSecret`; the caller cannot tell a wrong secret
    /// from a tampered file.
    pub fn open(path: &Path, master_secret: &str) -> Result<Self> {
        let raw = format::read_envelope(path)?;

        let storage_key = match gate::unlock_envelope(&raw, master_secret)? {
            GateOutcome::Granted(key) => key,
            GateOutcome::Denied => return Err(StegPassError::InvalidSecret),
        };

        let mut cipher_key = storage_key.derive_cipher_key()?;
        let plaintext = decrypt(&cipher_key, &raw.ciphertext);
        cipher_key.zeroize();
        let mut plaintext = plaintext?;

        let body: VaultBody = serde_json::from_slice(&plaintext)
            .map_err(|e| StegPassError::InvalidVaultFormat(format!("login table JSON: {e}")))?;
        plaintext.zeroize();

        Ok(Self {
            path: path.to_path_buf(),
            header: raw.header,
            next_id: body.next_id,
            logins: body.logins,
            storage_key,
        })
    }

    // ------------------------------------------------------------------
    // Login operations
    // ------------------------------------------------------------------

    /// Add a login, assign it a fresh id, and commit.
    ///
    /// Returns the assigned id.  `username` and `password` must be
    /// non-empty; the row is not persisted otherwise.
    pub fn insert(&mut self, new: NewLogin) -> Result<i64> {
        if new.username.is_empty() {
            return Err(StegPassError::InvalidLogin("username is empty".into()));
        }
        if new.password.is_empty() {
            return Err(StegPassError::InvalidLogin("password is empty".into()));
        }

        let id = self.next_id;
        self.logins.push(Login {
            id,
            username: new.username,
            password: new.password,
            uri: new.uri,
        });
        self.next_id += 1;

        // Roll the in-memory row back if the write does not apply, so a
        // failed insert leaves no trace.
        if let Err(e) = self.save() {
            self.logins.pop();
            self.next_id = id;
            return Err(e);
        }

        Ok(id)
    }

    /// Find all logins matching `filter`, in ascending id order.
    ///
    /// Fails with `EmptyCriteria` when both filters are absent or empty.
    /// Zero matches is a valid outcome: an empty Vec, not an error.
    pub fn query_by_substring(&self, filter: &LoginFilter) -> Result<Vec<Login>> {
        if filter.is_empty() {
            return Err(StegPassError::EmptyCriteria);
        }

        Ok(self
            .logins
            .iter()
            .filter(|login| filter.matches(login))
            .cloned()
            .collect())
    }

    /// Replace the password of the login with `id` and commit.
    pub fn update_password(&mut self, id: i64, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(StegPassError::InvalidLogin("password is empty".into()));
        }

        let login = self
            .logins
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(StegPassError::LoginNotFound(id))?;

        let mut previous = std::mem::replace(&mut login.password, new_password.to_string());

        if let Err(e) = self.save() {
            // Restore the old password so the handle matches what is on disk.
            if let Some(login) = self.logins.iter_mut().find(|l| l.id == id) {
                login.password = previous;
            }
            return Err(e);
        }
        previous.zeroize();

        Ok(())
    }

    /// Remove the login with `id` and commit.  Irreversible — confirmation
    /// is the caller's job.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let index = self
            .logins
            .iter()
            .position(|l| l.id == id)
            .ok_or(StegPassError::LoginNotFound(id))?;

        let removed = self.logins.remove(index);

        if let Err(e) = self.save() {
            self.logins.insert(index, removed);
            return Err(e);
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize, encrypt, and write the vault to disk atomically.
    ///
    /// Encrypts the login table under the HKDF cipher key and tags the
    /// envelope under the HKDF HMAC key, via temp-file + rename.
    fn save(&self) -> Result<()> {
        let body = VaultBody {
            next_id: self.next_id,
            logins: self.logins.clone(),
        };
        let mut plaintext = serde_json::to_vec(&body)
            .map_err(|e| StegPassError::SerializationError(format!("login table: {e}")))?;

        let mut cipher_key = self.storage_key.derive_cipher_key()?;
        let ciphertext = encrypt(&cipher_key, &plaintext);
        cipher_key.zeroize();
        plaintext.zeroize();
        let ciphertext = ciphertext?;

        let mut hmac_key = self.storage_key.derive_hmac_key()?;
        let written = format::write_envelope(&self.path, &self.header, &ciphertext, &hmac_key);
        hmac_key.zeroize();

        written
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of logins in the vault.
    pub fn login_count(&self) -> usize {
        self.logins.len()
    }

    /// Returns all logins in ascending id order.
    pub fn logins(&self) -> &[Login] {
        &self.logins
    }

    /// Returns the login with `id`, if present.
    pub fn get(&self, id: i64) -> Option<&Login> {
        self.logins.iter().find(|l| l.id == id)
    }

    /// Returns the vault creation timestamp.
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.header.created_at
    }
}
