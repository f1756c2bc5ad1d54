//! # coinflow-store
//!
//! SQLite persistence for processed transactions.
//!
//! - [`Database`]: thread-safe connection wrapper with idempotent schema
//!   setup (pragmas, `CREATE TABLE IF NOT EXISTS`, schema version)
//! - [`TransactionStore`]: append-only repository over the `transactions`
//!   table — insert once, read back by id, never update
//!
//! Rows are written inside an explicit SQLite transaction so a failed
//! insert leaves nothing half-written.

#![deny(unsafe_code)]

pub mod database;
pub mod schema;
pub mod transactions;

pub use database::Database;
pub use transactions::{PersistedTransaction, TransactionStore};
