//! Static user directory.
//!
//! Loaded once from a JSON document (`{"users": [...]}`) at construction
//! and immutable thereafter — the simulated stand-in for a real identity
//! store. Load failures are configuration errors raised at construction,
//! never per-transaction errors.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

/// One directory entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserEntry {
    /// Unique user identifier.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Whether the account may transact. Absent means inactive.
    #[serde(default)]
    pub active: bool,
    /// Optional directory role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Wire shape of the directory document.
#[derive(Deserialize)]
struct DirectoryDocument {
    users: Vec<UserEntry>,
}

/// Immutable user directory indexed by user id.
#[derive(Clone, Debug, Default)]
pub struct UserDirectory {
    users: BTreeMap<String, UserEntry>,
}

impl UserDirectory {
    /// Load the directory from a JSON document on disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::DirectoryMissing(path_str.clone())
            } else {
                ConfigError::DirectoryMalformed {
                    path: path_str.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let document: DirectoryDocument =
            serde_json::from_str(&raw).map_err(|e| ConfigError::DirectoryMalformed {
                path: path_str.clone(),
                reason: e.to_string(),
            })?;

        let directory = Self::from_entries(document.users);
        debug!(path = %path_str, users = directory.len(), "user directory loaded");
        Ok(directory)
    }

    /// Build a directory from in-memory entries (tests, substituted tables).
    #[must_use]
    pub fn from_entries(entries: Vec<UserEntry>) -> Self {
        let users = entries
            .into_iter()
            .map(|entry| (entry.user_id.clone(), entry))
            .collect();
        Self { users }
    }

    /// Look up a user by id.
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<&UserEntry> {
        self.users.get(user_id)
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn write_document(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn load_indexes_users_by_id() {
        let (_dir, path) = write_document(
            r#"{"users": [
                {"user_id": "USR001", "name": "Alice Johnson", "email": "alice@example.com", "active": true, "role": "trader"},
                {"user_id": "USR004", "name": "David Brown", "email": "david@example.com", "active": false}
            ]}"#,
        );
        let directory = UserDirectory::load(&path).unwrap();
        assert_eq!(directory.len(), 2);

        let alice = directory.get("USR001").unwrap();
        assert_eq!(alice.name, "Alice Johnson");
        assert!(alice.active);
        assert_eq!(alice.role.as_deref(), Some("trader"));

        let david = directory.get("USR004").unwrap();
        assert!(!david.active);
        assert!(david.role.is_none());
    }

    #[test]
    fn missing_file_is_a_construction_error() {
        let err = UserDirectory::load(Path::new("/nonexistent/users.json")).unwrap_err();
        assert!(matches!(err, ConfigError::DirectoryMissing(_)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let (_dir, path) = write_document("{not json");
        let err = UserDirectory::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::DirectoryMalformed { .. }));
    }

    #[test]
    fn document_without_users_list_is_malformed() {
        let (_dir, path) = write_document(r#"{"members": []}"#);
        let err = UserDirectory::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::DirectoryMalformed { .. }));
    }

    #[test]
    fn missing_active_flag_defaults_to_inactive() {
        let (_dir, path) = write_document(
            r#"{"users": [{"user_id": "USR009", "name": "Frank", "email": "frank@example.com"}]}"#,
        );
        let directory = UserDirectory::load(&path).unwrap();
        assert!(!directory.get("USR009").unwrap().active);
    }

    #[test]
    fn unknown_id_returns_none() {
        let directory = UserDirectory::from_entries(vec![]);
        assert!(directory.get("USR001").is_none());
        assert!(directory.is_empty());
    }
}
