//! Demo harness for the coinflow transaction pipeline.
//!
//! Builds the canonical five-stage pipeline against the bundled user
//! directory and a local SQLite store, then runs either the canned demo
//! transactions or one caller-supplied record, printing a summary per run.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use coinflow_core::directory::UserDirectory;
use coinflow_core::rates::{FeeTable, PriceTable};
use coinflow_core::record::{Record, TransactionInput};
use coinflow_pipeline::Pipeline;
use coinflow_store::Database;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "coinflow", about = "Five-stage BTC purchase pipeline demo")]
struct Args {
    /// Path to the user directory JSON document.
    #[arg(long, default_value = "data/users.json")]
    users: PathBuf,

    /// Path to the SQLite transaction database.
    #[arg(long, default_value = "data/transactions.db")]
    db: PathBuf,

    /// Process a single transaction given as JSON instead of the demo,
    /// e.g. '{"user_id":"USR001","btc_amount":0.5,"currency":"USD"}'.
    #[arg(long)]
    transaction: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let directory = UserDirectory::load(&args.users)
        .with_context(|| format!("loading user directory from {}", args.users.display()))?;
    let db = Database::open(&args.db)
        .with_context(|| format!("opening transaction database at {}", args.db.display()))?;

    let pipeline = Pipeline::standard(directory, PriceTable::default(), FeeTable::default(), db);
    tracing::info!(stages = pipeline.len(), "pipeline ready");

    match args.transaction {
        Some(raw) => {
            let input: TransactionInput =
                serde_json::from_str(&raw).context("parsing --transaction JSON")?;
            run_one(&pipeline, input)
        }
        None => {
            run_demo(&pipeline);
            Ok(())
        }
    }
}

/// Run one caller-supplied transaction; a pipeline failure is the exit
/// status of the process.
fn run_one(pipeline: &Pipeline, input: TransactionInput) -> Result<()> {
    let record = pipeline.execute(&Record::new(input))?;
    print_summary(&record);
    Ok(())
}

/// Run the canned demo transactions, continuing past failures.
fn run_demo(pipeline: &Pipeline) {
    for (index, (label, input)) in demo_cases().into_iter().enumerate() {
        println!("case {}: {label}", index + 1);
        match pipeline.execute(&Record::new(input)) {
            Ok(record) => print_summary(&record),
            Err(err) => println!("  rejected: {err}\n"),
        }
    }
}

fn demo_cases() -> Vec<(&'static str, TransactionInput)> {
    vec![
        (
            "valid USD purchase (Alice Johnson, 0.5 BTC)",
            TransactionInput::new("USR001", 0.5, "USD"),
        ),
        (
            "valid EUR purchase (Bob Smith, 1.2 BTC)",
            TransactionInput::new("USR002", 1.2, "EUR"),
        ),
        (
            "valid GBP purchase (Carol White, 0.25 BTC)",
            TransactionInput::new("USR003", 0.25, "GBP"),
        ),
        (
            "inactive user (David Brown, USR004)",
            TransactionInput::new("USR004", 0.1, "USD"),
        ),
        (
            "missing currency field",
            TransactionInput {
                user_id: Some("USR001".into()),
                btc_amount: Some(serde_json::json!(0.3)),
                currency: None,
            },
        ),
    ]
}

fn print_summary(record: &Record) {
    let (Ok(validated), Ok(user), Ok(quote), Ok(fees)) = (
        record.validated(),
        record.user(),
        record.quote(),
        record.fees(),
    ) else {
        return;
    };
    let Some(receipt) = &record.receipt else {
        return;
    };

    let currency = validated.currency;
    println!();
    println!("  id            : {}", receipt.transaction_id);
    println!("  user          : {} ({})", user.name, validated.user_id);
    println!("  email         : {}", user.email);
    println!("  btc amount    : {}", validated.amount_btc);
    println!("  btc price     : {:>12.2} {currency}", quote.unit_price);
    println!("  subtotal      : {:>12.2} {currency}", quote.subtotal);
    println!("  commission    : {:>12.2} {currency}", fees.fee);
    println!("  total payable : {:>12.2} {currency}", fees.total);
    println!("  status        : {}", receipt.status);
    println!("  timestamp     : {}", receipt.created_at);
    println!("  price source  : {}", quote.source);
    println!();
}
