//! # coinflow-pipeline
//!
//! Pipe-and-filter orchestration for BTC purchase transactions.
//!
//! - [`Stage`]: the flat one-method capability trait every stage implements
//! - [`stages`]: the five concrete stages — [`stages::Validate`],
//!   [`stages::Authenticate`], [`stages::Quote`], [`stages::Fee`],
//!   [`stages::Persist`]
//! - [`Pipeline`]: the orchestrator — ordered stage list, fail-fast
//!   execution, stage context attached to every failure
//!
//! A transaction enters as a raw [`coinflow_core::record::Record`] and
//! leaves fully enriched, or the run aborts at the first failing stage.

#![deny(unsafe_code)]

pub mod pipeline;
pub mod stage;
pub mod stages;

pub use pipeline::Pipeline;
pub use stage::Stage;
