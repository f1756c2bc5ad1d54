//! Stage 1 — input validation.
//!
//! Checks the three caller-supplied fields in order (`user_id`,
//! `btc_amount`, `currency`), normalizes them, and writes the
//! [`ValidatedInput`] section. Any failing check aborts immediately with
//! an error naming the offending field.

use serde_json::Value;
use tracing::debug;

use coinflow_core::currency::Currency;
use coinflow_core::errors::{InputError, PipelineError};
use coinflow_core::record::{Record, ValidatedInput};

use crate::stage::Stage;

/// Validates and normalizes raw caller input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Validate;

impl Stage for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn process(&self, mut record: Record) -> Result<Record, PipelineError> {
        // user_id: present, non-empty after trimming
        let user_id = record
            .input
            .user_id
            .as_deref()
            .ok_or(InputError::Missing("user_id"))?
            .trim();
        if user_id.is_empty() {
            return Err(InputError::Empty("user_id").into());
        }
        let user_id = user_id.to_string();

        // btc_amount: present, a JSON number, strictly positive.
        // A wrong JSON type is a distinct error from a missing or
        // out-of-range value.
        let amount_btc = match record.input.btc_amount.as_ref() {
            None => return Err(InputError::Missing("btc_amount").into()),
            Some(Value::Number(n)) => n.as_f64().ok_or(InputError::NotANumber {
                field: "btc_amount",
                found: "number",
            })?,
            Some(other) => {
                return Err(InputError::NotANumber {
                    field: "btc_amount",
                    found: json_type(other),
                }
                .into());
            }
        };
        if amount_btc <= 0.0 {
            return Err(InputError::NotPositive {
                field: "btc_amount",
                value: amount_btc,
            }
            .into());
        }

        // currency: present, non-empty, in the supported set
        let raw_currency = record
            .input
            .currency
            .as_deref()
            .ok_or(InputError::Missing("currency"))?;
        if raw_currency.trim().is_empty() {
            return Err(InputError::Empty("currency").into());
        }
        let currency: Currency = raw_currency.parse()?;

        debug!(user_id = %user_id, amount_btc, currency = %currency, "input validated");
        record.validated = Some(ValidatedInput {
            user_id,
            amount_btc,
            currency,
        });
        Ok(record)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use coinflow_core::record::TransactionInput;

    use super::*;

    fn run(input: TransactionInput) -> Result<Record, PipelineError> {
        Validate.process(Record::new(input))
    }

    fn input_err(result: Result<Record, PipelineError>) -> InputError {
        match result.unwrap_err() {
            PipelineError::Input(err) => err,
            other => panic!("expected input error, got {other}"),
        }
    }

    #[test]
    fn valid_input_is_normalized() {
        let record = run(TransactionInput::new("  USR001  ", 0.5, " usd ")).unwrap();
        let validated = record.validated().unwrap();
        assert_eq!(validated.user_id, "USR001");
        assert_eq!(validated.currency, Currency::Usd);
        assert!((validated.amount_btc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_user_id() {
        let input = TransactionInput {
            btc_amount: Some(serde_json::json!(0.5)),
            currency: Some("USD".into()),
            ..TransactionInput::default()
        };
        assert_eq!(input_err(run(input)), InputError::Missing("user_id"));
    }

    #[test]
    fn blank_user_id() {
        let input = TransactionInput::new("   ", 0.5, "USD");
        assert_eq!(input_err(run(input)), InputError::Empty("user_id"));
    }

    #[test]
    fn missing_amount() {
        let input = TransactionInput {
            user_id: Some("USR001".into()),
            currency: Some("USD".into()),
            ..TransactionInput::default()
        };
        assert_eq!(input_err(run(input)), InputError::Missing("btc_amount"));
    }

    #[test]
    fn string_amount_is_a_type_error_not_a_missing_field() {
        let input = TransactionInput {
            user_id: Some("USR001".into()),
            btc_amount: Some(Value::String("0.5".into())),
            currency: Some("USD".into()),
            ..TransactionInput::default()
        };
        assert_eq!(
            input_err(run(input)),
            InputError::NotANumber {
                field: "btc_amount",
                found: "string",
            }
        );
    }

    #[test]
    fn boolean_amount_is_a_type_error() {
        let input = TransactionInput {
            user_id: Some("USR001".into()),
            btc_amount: Some(Value::Bool(true)),
            currency: Some("USD".into()),
            ..TransactionInput::default()
        };
        assert_eq!(
            input_err(run(input)),
            InputError::NotANumber {
                field: "btc_amount",
                found: "boolean",
            }
        );
    }

    #[test]
    fn negative_amount_must_be_greater_than_zero() {
        let err = input_err(run(TransactionInput::new("USR003", -0.25, "GBP")));
        assert_eq!(
            err,
            InputError::NotPositive {
                field: "btc_amount",
                value: -0.25,
            }
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = input_err(run(TransactionInput::new("USR001", 0.0, "USD")));
        assert!(matches!(err, InputError::NotPositive { .. }));
    }

    #[test]
    fn missing_currency() {
        let input = TransactionInput {
            user_id: Some("USR001".into()),
            btc_amount: Some(serde_json::json!(0.3)),
            ..TransactionInput::default()
        };
        assert_eq!(input_err(run(input)), InputError::Missing("currency"));
    }

    #[test]
    fn blank_currency() {
        let input = TransactionInput::new("USR001", 0.3, "  ");
        assert_eq!(input_err(run(input)), InputError::Empty("currency"));
    }

    #[test]
    fn unsupported_currency() {
        let err = input_err(run(TransactionInput::new("USR001", 0.3, "JPY")));
        assert_eq!(err, InputError::UnsupportedCurrency("JPY".into()));
    }
}
