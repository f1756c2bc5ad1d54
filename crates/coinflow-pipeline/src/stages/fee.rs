//! Stage 4 — commission.
//!
//! Converts the fixed base fee into the transaction currency via the
//! [`FeeTable`] and adds it to the quoted subtotal. The fee table is
//! checked independently of the price table: the two are separate maps
//! and may drift apart.

use tracing::debug;

use coinflow_core::errors::{PipelineError, UpstreamError};
use coinflow_core::rates::{FeeTable, round_to_cents};
use coinflow_core::record::{FeeAssessment, Record};

use crate::stage::Stage;

/// Applies the commission schedule.
pub struct Fee {
    fees: FeeTable,
}

impl Fee {
    /// A stage owning its fee schedule.
    #[must_use]
    pub fn new(fees: FeeTable) -> Self {
        Self { fees }
    }
}

impl Stage for Fee {
    fn name(&self) -> &'static str {
        "fee"
    }

    fn process(&self, mut record: Record) -> Result<Record, PipelineError> {
        let currency = record.validated()?.currency;
        let subtotal = record.quote()?.subtotal;

        let rate = self
            .fees
            .rate(currency)
            .ok_or(UpstreamError::FeeRateUnavailable(currency))?;

        // Per-step rounding: fee first, then the sum.
        let fee = round_to_cents(self.fees.base_fee() * rate);
        let total = round_to_cents(subtotal + fee);
        debug!(currency = %currency, fee, subtotal, total, "fee applied");

        record.fees = Some(FeeAssessment {
            fee,
            fee_currency: currency,
            base_fee: self.fees.base_fee(),
            subtotal,
            total,
        });
        Ok(record)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
