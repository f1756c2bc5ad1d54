//! The per-transaction record threaded through the pipeline.
//!
//! A [`Record`] starts as the raw caller input and gains one typed section
//! per stage: validation, user profile, price quote, fee assessment, and
//! finally the persistence receipt. Sections are only ever added — once a
//! stage has written its section, every later stage may rely on it being
//! present, which the `Result`-returning accessors enforce.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::Currency;
use crate::errors::{ConfigError, PipelineError};
use crate::ids::TransactionId;

/// Terminal status written by the persistence stage.
pub const STATUS_COMPLETED: &str = "completed";

/// The three caller-supplied fields, kept raw.
///
/// `btc_amount` stays a [`serde_json::Value`] so that a wrong-typed amount
/// (e.g. a string) reaches the validation stage and produces a precise
/// field-level error instead of a deserialization failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Caller-supplied user identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Caller-supplied BTC amount, any JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub btc_amount: Option<Value>,
    /// Caller-supplied currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl TransactionInput {
    /// A fully populated input, as a well-behaved caller would submit it.
    #[must_use]
    pub fn new(user_id: &str, btc_amount: f64, currency: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            btc_amount: serde_json::Number::from_f64(btc_amount).map(Value::Number),
            currency: Some(currency.to_string()),
        }
    }
}

/// Output of the validation stage: normalized, typed caller fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidatedInput {
    /// Trimmed user identifier.
    pub user_id: String,
    /// The BTC amount, confirmed numeric and positive.
    pub amount_btc: f64,
    /// Normalized currency code.
    pub currency: Currency,
}

/// Output of the authentication stage: the directory profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Directory role, `"unknown"` when the entry carries none.
    pub role: String,
}

/// Output of the quote stage: the simulated remote price lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Price of 1 BTC in the transaction currency.
    pub unit_price: f64,
    /// `amount_btc × unit_price`, rounded to cents.
    pub subtotal: f64,
    /// Label of the price data source.
    pub source: String,
}

/// Output of the fee stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeeAssessment {
    /// Commission in the transaction currency, rounded to cents.
    pub fee: f64,
    /// Currency the fee is denominated in.
    pub fee_currency: Currency,
    /// The fixed base fee in the reference currency (USD).
    pub base_fee: f64,
    /// Copy of the quote subtotal the fee was added to.
    pub subtotal: f64,
    /// `subtotal + fee`, rounded to cents.
    pub total: f64,
}

/// Output of the persistence stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Generated unique id of the stored row.
    pub transaction_id: TransactionId,
    /// RFC 3339 UTC timestamp of the write.
    pub created_at: String,
    /// Terminal status, always [`STATUS_COMPLETED`].
    pub status: String,
}

/// The per-transaction context passed from stage to stage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Record {
    /// Raw caller input.
    pub input: TransactionInput,
    /// Written by the validation stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated: Option<ValidatedInput>,
    /// Written by the authentication stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    /// Written by the quote stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<PriceQuote>,
    /// Written by the fee stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<FeeAssessment>,
    /// Written by the persistence stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
}

impl Record {
    /// A fresh record wrapping raw caller input.
    #[must_use]
    pub fn new(input: TransactionInput) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// The validation section, required by every stage after the first.
    pub fn validated(&self) -> Result<&ValidatedInput, PipelineError> {
        self.validated
            .as_ref()
            .ok_or_else(|| ConfigError::MissingContext("validated").into())
    }

    /// The user profile, required by the persistence stage.
    pub fn user(&self) -> Result<&UserProfile, PipelineError> {
        self.user
            .as_ref()
            .ok_or_else(|| ConfigError::MissingContext("user").into())
    }

    /// The price quote, required by the fee and persistence stages.
    pub fn quote(&self) -> Result<&PriceQuote, PipelineError> {
        self.quote
            .as_ref()
            .ok_or_else(|| ConfigError::MissingContext("quote").into())
    }

    /// The fee assessment, required by the persistence stage.
    pub fn fees(&self) -> Result<&FeeAssessment, PipelineError> {
        self.fees
            .as_ref()
            .ok_or_else(|| ConfigError::MissingContext("fees").into())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_deserializes_with_missing_fields() {
        let input: TransactionInput =
            serde_json::from_str(r#"{"user_id": "USR001", "btc_amount": 0.3}"#).unwrap();
        assert_eq!(input.user_id.as_deref(), Some("USR001"));
        assert!(input.btc_amount.is_some());
        assert!(input.currency.is_none());
    }

    #[test]
    fn input_preserves_wrong_typed_amount() {
        let input: TransactionInput =
            serde_json::from_str(r#"{"user_id": "USR001", "btc_amount": "half"}"#).unwrap();
        assert_eq!(input.btc_amount, Some(Value::String("half".into())));
    }

    #[test]
    fn fresh_record_has_no_sections() {
        let record = Record::new(TransactionInput::new("USR001", 0.5, "USD"));
        assert!(record.validated.is_none());
        assert!(record.user.is_none());
        assert!(record.quote.is_none());
        assert!(record.fees.is_none());
        assert!(record.receipt.is_none());
    }

    #[test]
    fn missing_section_reports_stage_ordering_violation() {
        let record = Record::default();
        let err = record.validated().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Config(ConfigError::MissingContext("validated"))
        ));
    }

    #[test]
    fn written_section_is_readable() {
        let mut record = Record::new(TransactionInput::new("USR001", 0.5, "USD"));
        record.validated = Some(ValidatedInput {
            user_id: "USR001".into(),
            amount_btc: 0.5,
            currency: Currency::Usd,
        });
        let validated = record.validated().unwrap();
        assert_eq!(validated.user_id, "USR001");
        assert_eq!(validated.currency, Currency::Usd);
    }

    #[test]
    fn record_serializes_without_empty_sections() {
        let record = Record::new(TransactionInput::new("USR001", 0.5, "USD"));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("validated").is_none());
        assert!(json.get("receipt").is_none());
        assert_eq!(json["input"]["user_id"], "USR001");
    }
}
