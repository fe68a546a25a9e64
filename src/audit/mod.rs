//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (init, add, edit, rem, hide,
//! reveal) in a local SQLite database next to the vault file.  Only
//! operation names, vault paths, and uris are recorded — never usernames
//! or passwords.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{Result, StegPassError};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub vault: String,
    pub uri: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<vault dir>/stegpass-audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(vault_path: &Path) -> Option<Self> {
        let db_path = Self::db_path(vault_path);
        let conn = Connection::open(&db_path).ok()?;

        // Restrict the audit database to the owner.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                operation TEXT NOT NULL,
                vault     TEXT NOT NULL,
                uri       TEXT,
                details   TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(&self, operation: &str, vault: &str, uri: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, vault, uri, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, vault, uri, details],
        );
    }

    /// Query recent audit entries, most recent first.
    pub fn query(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, vault, uri, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(|e| StegPassError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map([limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    vault: row.get(3)?,
                    uri: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| StegPassError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| StegPassError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database next to a vault file.
    pub fn db_path(vault_path: &Path) -> PathBuf {
        let dir = vault_path.parent().unwrap_or(Path::new("."));
        dir.join("stegpass-audit.db")
    }
}

/// Convenience helper: log an audit event for a vault.
///
/// Opens the audit database, logs the event, and silently ignores any
/// errors.  This is safe to call from any command — it never fails the
/// parent operation.
pub fn log_audit(vault_path: &Path, op: &str, uri: Option<&str>, details: Option<&str>) {
    if let Some(audit) = AuditLog::open(vault_path) {
        audit.log(op, &vault_path.to_string_lossy(), uri, details);
    }
}
