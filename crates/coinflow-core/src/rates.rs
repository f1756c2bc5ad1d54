//! Price and fee lookup tables, plus money rounding.
//!
//! Both tables are immutable configuration objects handed to stage
//! constructors. The defaults are the simulated external sources (a mock
//! BTC price service and a fixed commission schedule); tests substitute
//! their own tables. The two tables are independent maps — no stage may
//! assume they cover the same currencies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// Label of the simulated price service.
pub const MOCK_PRICE_SOURCE: &str = "MockBTCPriceAPI v1.0";

/// Fixed commission in the reference currency (USD).
pub const BASE_FEE_USD: f64 = 5.00;

/// Round to two decimal places, ties to even.
///
/// Applied at every arithmetic step (price×amount, fee, sum) rather than
/// once at the end; the per-step order changes cent-level results and is
/// part of the contract.
#[must_use]
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// ─────────────────────────────────────────────────────────────────────────────
// PriceTable
// ─────────────────────────────────────────────────────────────────────────────

/// Unit prices for 1 BTC per currency, as served by the simulated remote
/// price source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceTable {
    rates: BTreeMap<Currency, f64>,
    source: String,
}

impl PriceTable {
    /// A table with explicit rates and source label.
    #[must_use]
    pub fn new(rates: BTreeMap<Currency, f64>, source: impl Into<String>) -> Self {
        Self {
            rates,
            source: source.into(),
        }
    }

    /// A table with no entries, for exercising upstream-gap failures.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(BTreeMap::new(), MOCK_PRICE_SOURCE)
    }

    /// Unit price for the currency. `None` models a data-source gap, not
    /// an invalid currency — callers decide how to surface it.
    #[must_use]
    pub fn price(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied()
    }

    /// Label of the backing price source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for PriceTable {
    /// The mock price service: fixed realistic rates.
    fn default() -> Self {
        Self::new(
            BTreeMap::from([
                (Currency::Usd, 65_000.00),
                (Currency::Eur, 60_500.00),
                (Currency::Gbp, 51_800.00),
            ]),
            MOCK_PRICE_SOURCE,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FeeTable
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed commission schedule: a base fee in USD and per-currency
/// conversion rates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeeTable {
    base_fee: f64,
    rates: BTreeMap<Currency, f64>,
}

impl FeeTable {
    /// A schedule with an explicit base fee and conversion rates.
    #[must_use]
    pub fn new(base_fee: f64, rates: BTreeMap<Currency, f64>) -> Self {
        Self { base_fee, rates }
    }

    /// A schedule with no conversion rates, for exercising gap failures.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(BASE_FEE_USD, BTreeMap::new())
    }

    /// The base fee in the reference currency.
    #[must_use]
    pub fn base_fee(&self) -> f64 {
        self.base_fee
    }

    /// USD → target conversion rate for the fee. `None` when the schedule
    /// has no rate for the currency.
    #[must_use]
    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied()
    }
}

impl Default for FeeTable {
    /// The reference schedule: 5.00 USD converted at fixed rates.
    fn default() -> Self {
        Self::new(
            BASE_FEE_USD,
            BTreeMap::from([
                (Currency::Usd, 1.0000), // 5.00 USD → 5.00 USD
                (Currency::Eur, 0.9240), // 5.00 USD → 4.62 EUR
                (Currency::Gbp, 0.7920), // 5.00 USD → 3.96 GBP
            ]),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
