//! SQL DDL for the transaction store.
//!
//! Everything here is idempotent (`CREATE ... IF NOT EXISTS`) so opening a
//! database repeatedly is safe. WAL mode and foreign keys are enabled at
//! connection time.

/// Current schema version, recorded on first open.
pub const SCHEMA_VERSION: u32 = 1;

/// Table and index definitions.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS transactions (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    user_name       TEXT NOT NULL,
    user_email      TEXT NOT NULL,
    btc_amount      REAL NOT NULL,
    currency        TEXT NOT NULL,
    unit_price      REAL NOT NULL,
    subtotal        REAL NOT NULL,
    fee             REAL NOT NULL,
    total_with_fee  REAL NOT NULL,
    price_source    TEXT NOT NULL,
    status          TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
CREATE INDEX IF NOT EXISTS idx_transactions_created ON transactions(created_at);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);
";

/// Connection pragmas applied before any statement.
pub const PRAGMAS: &str = r"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
";
