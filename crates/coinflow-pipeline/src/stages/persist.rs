//! Stage 5 — persistence.
//!
//! Writes the fully enriched transaction as one append-only row and
//! enriches the record with the generated id, timestamp, and terminal
//! status. Schema setup happens when the [`Database`] is opened and is
//! idempotent; this stage only ever inserts.

use chrono::Utc;
use tracing::debug;

use coinflow_core::errors::PipelineError;
use coinflow_core::ids::TransactionId;
use coinflow_core::record::{Receipt, Record, STATUS_COMPLETED};
use coinflow_store::{Database, PersistedTransaction, TransactionStore};

use crate::stage::Stage;

/// Persists the processed transaction.
pub struct Persist {
    store: TransactionStore,
}

impl Persist {
    /// A stage writing through the given database handle.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            store: TransactionStore::new(db),
        }
    }
}

impl Stage for Persist {
    fn name(&self) -> &'static str {
        "persist"
    }

    fn process(&self, mut record: Record) -> Result<Record, PipelineError> {
        let validated = record.validated()?.clone();
        let user = record.user()?.clone();
        let quote = record.quote()?.clone();
        let fees = record.fees()?.clone();

        let id = TransactionId::new();
        let created_at = Utc::now().to_rfc3339();

        let row = PersistedTransaction {
            id: id.clone(),
            user_id: validated.user_id,
            user_name: user.name,
            user_email: user.email,
            btc_amount: validated.amount_btc,
            currency: validated.currency,
            unit_price: quote.unit_price,
            subtotal: fees.subtotal,
            fee: fees.fee,
            total_with_fee: fees.total,
            price_source: quote.source,
            status: STATUS_COMPLETED.to_string(),
            created_at: created_at.clone(),
        };
        self.store.insert(&row)?;
        debug!(id = %id, created_at = %created_at, "transaction persisted");

        record.receipt = Some(Receipt {
            transaction_id: id,
            created_at,
            status: STATUS_COMPLETED.to_string(),
        });
        Ok(record)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
