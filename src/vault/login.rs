//! Login rows stored inside a vault.
//!
//! The whole login table is encrypted as one blob, so these types carry
//! plaintext fields — they only ever exist in memory behind an unlocked
//! `VaultStore`.

use serde::{Deserialize, Serialize};

/// A single login row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    /// Store-assigned id, unique within the vault and never reused.
    pub id: i64,

    /// Account name (e.g. "alice@example.com").
    pub username: String,

    /// The stored password.
    pub password: String,

    /// Site or service this login belongs to, if recorded.
    pub uri: Option<String>,
}

/// A login as supplied by the caller, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewLogin {
    pub username: String,
    pub password: String,
    pub uri: Option<String>,
}

/// Substring filters for looking up logins.
///
/// Filters combine with logical AND; matching is a case-sensitive substring
/// test.  A login with no uri never matches a uri filter.
#[derive(Debug, Clone, Default)]
pub struct LoginFilter {
    pub uri: Option<String>,
    pub username: Option<String>,
}

impl LoginFilter {
    /// True when neither filter would constrain anything.
    pub fn is_empty(&self) -> bool {
        let blank = |f: &Option<String>| f.as_deref().map_or(true, str::is_empty);
        blank(&self.uri) && blank(&self.username)
    }

    /// Whether `login` satisfies both filters.
    pub fn matches(&self, login: &Login) -> bool {
        if let Some(ref uri_sub) = self.uri {
            if !uri_sub.is_empty() {
                match login.uri {
                    Some(ref uri) if uri.contains(uri_sub.as_str()) => {}
                    _ => return false,
                }
            }
        }
        if let Some(ref user_sub) = self.username {
            if !user_sub.is_empty() && !login.username.contains(user_sub.as_str()) {
                return false;
            }
        }
        true
    }
}
