//! Stage 2 — user authentication.
//!
//! Confirms the validated user id against the immutable [`UserDirectory`]
//! and enriches the record with the directory profile. The directory is
//! loaded once at construction; per-transaction failures here are always
//! authorization errors, never load errors.

use tracing::debug;

use coinflow_core::directory::UserDirectory;
use coinflow_core::errors::{AuthError, PipelineError};
use coinflow_core::record::{Record, UserProfile};

use crate::stage::Stage;

/// Default role when the directory entry carries none.
const ROLE_UNKNOWN: &str = "unknown";

/// Authenticates the user against a static directory.
pub struct Authenticate {
    directory: UserDirectory,
}

impl Authenticate {
    /// A stage owning its directory.
    #[must_use]
    pub fn new(directory: UserDirectory) -> Self {
        Self { directory }
    }
}

impl Stage for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    fn process(&self, mut record: Record) -> Result<Record, PipelineError> {
        let user_id = record.validated()?.user_id.clone();

        let entry = self
            .directory
            .get(&user_id)
            .ok_or_else(|| AuthError::UnknownUser(user_id.clone()))?;

        if !entry.active {
            return Err(AuthError::InactiveAccount {
                user_id,
                name: entry.name.clone(),
            }
            .into());
        }

        let profile = UserProfile {
            name: entry.name.clone(),
            email: entry.email.clone(),
            role: entry
                .role
                .clone()
                .unwrap_or_else(|| ROLE_UNKNOWN.to_string()),
        };
        debug!(user_id = %user_id, name = %profile.name, role = %profile.role, "user authenticated");

        record.user = Some(profile);
        Ok(record)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
