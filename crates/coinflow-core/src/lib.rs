//! # coinflow-core
//!
//! Foundation types for the coinflow transaction pipeline.
//!
//! This crate provides the shared vocabulary that the store, pipeline, and
//! binary crates depend on:
//!
//! - **Record**: [`record::Record`] — the per-transaction context, one
//!   optional typed section per pipeline stage
//! - **Branded IDs**: [`ids::TransactionId`] as a `txn_`-prefixed newtype
//! - **Currency**: [`currency::Currency`] — the closed set of supported codes
//! - **Errors**: [`errors::PipelineError`] hierarchy via `thiserror`
//! - **Lookup tables**: [`directory::UserDirectory`], [`rates::PriceTable`],
//!   [`rates::FeeTable`] — loaded once, immutable thereafter
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other coinflow crates.

#![deny(unsafe_code)]

pub mod currency;
pub mod directory;
pub mod errors;
pub mod ids;
pub mod rates;
pub mod record;
