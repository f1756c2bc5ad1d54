//! Stage 3 — price quote.
//!
//! Simulates the remote price query: looks up the unit price for the
//! validated currency in the [`PriceTable`] and computes the subtotal.
//! A missing table entry is an upstream-data gap, not a validation
//! failure — the currency already passed the whitelist.

use tracing::debug;

use coinflow_core::errors::{PipelineError, UpstreamError};
use coinflow_core::rates::{PriceTable, round_to_cents};
use coinflow_core::record::{PriceQuote, Record};

use crate::stage::Stage;

/// Quotes the transaction against a price table.
pub struct Quote {
    prices: PriceTable,
}

impl Quote {
    /// A stage owning its price table.
    #[must_use]
    pub fn new(prices: PriceTable) -> Self {
        Self { prices }
    }
}

impl Stage for Quote {
    fn name(&self) -> &'static str {
        "quote"
    }

    fn process(&self, mut record: Record) -> Result<Record, PipelineError> {
        let (amount_btc, currency) = {
            let validated = record.validated()?;
            (validated.amount_btc, validated.currency)
        };

        let unit_price = self
            .prices
            .price(currency)
            .ok_or(UpstreamError::PriceUnavailable(currency))?;

        let subtotal = round_to_cents(amount_btc * unit_price);
        debug!(
            currency = %currency,
            unit_price,
            subtotal,
            source = self.prices.source(),
            "price quoted"
        );

        record.quote = Some(PriceQuote {
            unit_price,
            subtotal,
            source: self.prices.source().to_string(),
        });
        Ok(record)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use coinflow_core::currency::Currency;
    use coinflow_core::rates::MOCK_PRICE_SOURCE;
    use coinflow_core::record::{TransactionInput, ValidatedInput};

    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn validated_record(amount_btc: f64, currency: Currency) -> Record {
        let mut record = Record::new(TransactionInput::new("USR001", amount_btc, currency.as_str()));
        record.validated = Some(ValidatedInput {
            user_id: "USR001".into(),
            amount_btc,
            currency,
        });
        record
    }

    #[test]
    fn quotes_usd_at_default_rate() {
        let stage = Quote::new(PriceTable::default());
        let record = stage.process(validated_record(0.5, Currency::Usd)).unwrap();

        let quote = record.quote().unwrap();
        // 0.5 BTC × 65_000.00 = 32_500.00
        assert!(approx_eq(quote.unit_price, 65_000.00));
        assert!(approx_eq(quote.subtotal, 32_500.00));
        assert_eq!(quote.source, MOCK_PRICE_SOURCE);
    }

    #[test]
    fn quotes_eur_at_default_rate() {
        let stage = Quote::new(PriceTable::default());
        let record = stage.process(validated_record(1.2, Currency::Eur)).unwrap();
        // 1.2 BTC × 60_500.00 = 72_600.00
        assert!(approx_eq(record.quote().unwrap().subtotal, 72_600.00));
    }

    #[test]
    fn subtotal_is_rounded_to_cents() {
        let stage = Quote::new(PriceTable::new(
            std::collections::BTreeMap::from([(Currency::Usd, 65_432.10)]),
            "test-source",
        ));
        let record = stage
            .process(validated_record(0.0123, Currency::Usd))
            .unwrap();
        // 0.0123 × 65_432.10 = 804.814_83 → 804.81
        assert!(approx_eq(record.quote().unwrap().subtotal, 804.81));
    }

    #[test]
    fn missing_price_is_an_upstream_gap() {
        let stage = Quote::new(PriceTable::empty());
        let err = stage
            .process(validated_record(0.5, Currency::Gbp))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Upstream(UpstreamError::PriceUnavailable(Currency::Gbp))
        ));
    }

    #[test]
    fn unvalidated_record_is_a_stage_ordering_violation() {
        let stage = Quote::new(PriceTable::default());
        let err = stage.process(Record::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
