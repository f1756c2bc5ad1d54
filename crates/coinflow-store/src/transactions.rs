//! Append-only repository over the `transactions` table.

use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use coinflow_core::currency::Currency;
use coinflow_core::errors::StorageError;
use coinflow_core::ids::TransactionId;

use crate::database::Database;

/// One stored transaction row. Written once, never updated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedTransaction {
    /// Generated unique id.
    pub id: TransactionId,
    /// Validated user id.
    pub user_id: String,
    /// Display name from the directory.
    pub user_name: String,
    /// Email from the directory.
    pub user_email: String,
    /// Purchased BTC amount.
    pub btc_amount: f64,
    /// Settlement currency.
    pub currency: Currency,
    /// Quoted price of 1 BTC.
    pub unit_price: f64,
    /// Quote subtotal, rounded to cents.
    pub subtotal: f64,
    /// Commission, rounded to cents.
    pub fee: f64,
    /// Final payable amount.
    pub total_with_fee: f64,
    /// Label of the price data source.
    pub price_source: String,
    /// Terminal status.
    pub status: String,
    /// RFC 3339 UTC timestamp of the write.
    pub created_at: String,
}

/// Repository for persisted transactions.
pub struct TransactionStore {
    db: Database,
}

impl TransactionStore {
    /// Wrap a database handle.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert one row.
    ///
    /// Runs inside an explicit SQLite transaction: on any failure the
    /// transaction rolls back on drop and nothing half-written remains
    /// visible.
    pub fn insert(&self, row: &PersistedTransaction) -> Result<(), StorageError> {
        self.db.with_conn(|conn| {
            let tx = conn.unchecked_transaction().map_err(db_err)?;
            let _ = tx
                .execute(
                    "INSERT INTO transactions (
                        id, user_id, user_name, user_email,
                        btc_amount, currency, unit_price,
                        subtotal, fee, total_with_fee,
                        price_source, status, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    params![
                        row.id.as_str(),
                        row.user_id,
                        row.user_name,
                        row.user_email,
                        row.btc_amount,
                        row.currency.as_str(),
                        row.unit_price,
                        row.subtotal,
                        row.fee,
                        row.total_with_fee,
                        row.price_source,
                        row.status,
                        row.created_at,
                    ],
                )
                .map_err(db_err)?;
            tx.commit().map_err(db_err)?;
            debug!(id = %row.id, user_id = %row.user_id, "transaction stored");
            Ok(())
        })
    }

    /// Fetch a row by id.
    pub fn get(&self, id: &TransactionId) -> Result<Option<PersistedTransaction>, StorageError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, user_name, user_email,
                        btc_amount, currency, unit_price,
                        subtotal, fee, total_with_fee,
                        price_source, status, created_at
                 FROM transactions WHERE id = ?1",
                params![id.as_str()],
                map_row,
            )
            .optional()
            .map_err(db_err)
        })
    }

    /// Total number of stored transactions.
    pub fn count(&self) -> Result<i64, StorageError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
                .map_err(db_err)
        })
    }

    /// Most recent transactions, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<PersistedTransaction>, StorageError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, user_name, user_email,
                            btc_amount, currency, unit_price,
                            subtotal, fee, total_with_fee,
                            price_source, status, created_at
                     FROM transactions ORDER BY created_at DESC LIMIT ?1",
                )
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![limit as i64], map_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(rows)
        })
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PersistedTransaction> {
    let currency: String = row.get(5)?;
    let currency = currency.parse::<Currency>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(PersistedTransaction {
        id: TransactionId::from_raw(row.get::<_, String>(0)?),
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        user_email: row.get(3)?,
        btc_amount: row.get(4)?,
        currency,
        unit_price: row.get(6)?,
        subtotal: row.get(7)?,
        fee: row.get(8)?,
        total_with_fee: row.get(9)?,
        price_source: row.get(10)?,
        status: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn db_err(e: rusqlite::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
