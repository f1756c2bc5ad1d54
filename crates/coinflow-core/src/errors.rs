//! Error hierarchy for the transaction pipeline.
//!
//! One enum per error domain, built on [`thiserror`]:
//!
//! - [`InputError`]: missing/empty/wrong-typed/out-of-range caller fields
//! - [`AuthError`]: unknown user id or inactive account
//! - [`UpstreamError`]: no price or fee rate for an otherwise-valid currency
//! - [`StorageError`]: the backing store failed to persist or read a record
//! - [`ConfigError`]: setup-time failures (empty pipeline, directory load)
//! - [`PipelineError`]: top-level enum the orchestrator propagates, with
//!   stage index and name attached via [`PipelineError::Stage`]

use thiserror::Error;

use crate::currency::Currency;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, PipelineError>;

// ─────────────────────────────────────────────────────────────────────────────
// Domain errors
// ─────────────────────────────────────────────────────────────────────────────

/// A caller-supplied field failed validation.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    /// The field is absent from the input.
    #[error("missing required field `{0}`")]
    Missing(&'static str),

    /// The field is present but blank after trimming.
    #[error("field `{0}` cannot be empty")]
    Empty(&'static str),

    /// The field holds a value of the wrong JSON type.
    #[error("field `{field}` must be a number, got {found}")]
    NotANumber {
        /// Offending field name.
        field: &'static str,
        /// JSON type actually found.
        found: &'static str,
    },

    /// The amount is zero or negative.
    #[error("field `{field}` must be greater than 0, got {value}")]
    NotPositive {
        /// Offending field name.
        field: &'static str,
        /// Value actually supplied.
        value: f64,
    },

    /// The currency code is not in the supported set.
    #[error("unsupported currency `{0}` (accepted: USD, EUR, GBP)")]
    UnsupportedCurrency(String),
}

/// The user could not be authenticated against the directory.
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    /// No directory entry for the id.
    #[error("user `{0}` does not exist in the directory")]
    UnknownUser(String),

    /// The entry exists but the account is not active.
    #[error("account for user `{user_id}` ({name}) is inactive")]
    InactiveAccount {
        /// The user id that was looked up.
        user_id: String,
        /// Display name from the directory entry.
        name: String,
    },
}

/// An external data source has no entry for a supported currency.
///
/// Distinct from [`InputError`]: the currency already passed validation, so
/// a missing table entry models a downstream data-source gap.
#[derive(Debug, Error, PartialEq)]
pub enum UpstreamError {
    /// The price table has no unit price for the currency.
    #[error("no price available for currency {0}")]
    PriceUnavailable(Currency),

    /// The fee table has no conversion rate for the currency.
    #[error("no fee conversion rate defined for currency {0}")]
    FeeRateUnavailable(Currency),
}

/// The backing store failed.
///
/// Variants carry rendered messages; the conversion from `rusqlite::Error`
/// happens at the store boundary so this crate stays database-agnostic.
#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
    /// SQLite-level failure.
    #[error("database error: {0}")]
    Database(String),

    /// Filesystem-level failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// No row for the requested id.
    #[error("transaction `{0}` not found")]
    NotFound(String),
}

/// Setup-time failure, raised before or outside any pipeline run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `execute` was called on a pipeline with no stages.
    #[error("pipeline has no stages configured")]
    NoStages,

    /// The user directory source file does not exist.
    #[error("user directory not found at `{0}`")]
    DirectoryMissing(String),

    /// The user directory source exists but could not be parsed.
    #[error("user directory at `{path}` is malformed: {reason}")]
    DirectoryMalformed {
        /// Source path.
        path: String,
        /// Parse failure detail.
        reason: String,
    },

    /// A stage consumed a record section that no earlier stage produced.
    /// Unreachable in a correctly assembled pipeline.
    #[error("record has no `{0}` section; pipeline stages are mis-ordered")]
    MissingContext(&'static str),
}

// ─────────────────────────────────────────────────────────────────────────────
// PipelineError — top-level enum
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level error type for the transaction pipeline.
///
/// Every stage failure surfaces as one of the domain variants; the
/// orchestrator wraps it in [`PipelineError::Stage`] so the caller knows
/// which stage failed and why.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Validation failure.
    #[error("{0}")]
    Input(#[from] InputError),

    /// Authentication failure.
    #[error("{0}")]
    Authorization(#[from] AuthError),

    /// External data-source gap.
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// Persistence failure.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Setup-time failure.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A stage failed mid-run; carries the 1-based stage index and name.
    #[error("stage {index} ({stage}) failed: {source}")]
    Stage {
        /// 1-based position in the pipeline.
        index: usize,
        /// Stage name as reported by `Stage::name`.
        stage: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Unwrap [`PipelineError::Stage`] wrappers down to the domain error.
    #[must_use]
    pub fn root(&self) -> &PipelineError {
        let mut err = self;
        while let PipelineError::Stage { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// The stage index attached by the orchestrator, if any.
    #[must_use]
    pub fn stage_index(&self) -> Option<usize> {
        match self {
            PipelineError::Stage { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
