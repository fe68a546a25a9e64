//! Vault module — encrypted login storage.
//!
//! This module provides:
//! - `Login`, `NewLogin`, and `LoginFilter` types (`login`)
//! - Binary envelope format with HMAC integrity (`format`)
//! - High-level `VaultStore` for creating, opening, and managing vaults
//!   (`store`)

pub mod format;
pub mod login;
pub mod store;

// Re-export the most commonly used items.
pub use format::{StoredArgon2Params, VaultHeader};
pub use login::{Login, LoginFilter, NewLogin};
pub use store::VaultStore;
